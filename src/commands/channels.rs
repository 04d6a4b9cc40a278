use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::inventory::inventory;
use crate::slack::SlackApi;
use crate::support::print::print_inventory;

/// List existing channels that follow the naming convention
#[derive(Args, Debug, Clone)]
pub struct ChannelsCommand {}

#[async_trait]
impl CliCommand for ChannelsCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let config = ctx.config()?;
        let client = ctx.slack_client()?;
        let channels = client
            .list_private_channels()
            .await
            .context("Failed to list private channels")?;
        print_inventory(&inventory(channels, &config.channels));
        Ok(())
    }
}
