use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::app::AppContext;
use crate::classify::classify_directory;
use crate::commands::CliCommand;
use crate::directory::fetch_directory;
use crate::support::print::print_roster;

/// Show how workspace members are classified
#[derive(Args, Debug, Clone)]
pub struct MembersCommand {
    /// Also list excluded users with the reason
    #[arg(long)]
    pub all: bool,
}

#[async_trait]
impl CliCommand for MembersCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let config = ctx.config()?;
        let client = ctx.slack_client()?;
        let directory = fetch_directory(&client, &config.membership).await?;
        let roster = classify_directory(&directory, config)?;
        print_roster(&roster, self.all);
        Ok(())
    }
}
