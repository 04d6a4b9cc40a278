pub mod channels;
pub mod members;
pub mod reconcile;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::config::CONFIG_PATH_VAR;

pub use channels::ChannelsCommand;
pub use members::MembersCommand;
pub use reconcile::ReconcileCommand;

#[async_trait]
pub trait CliCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()>;
}

#[derive(Parser, Debug, Clone)]
#[command(name = "board-channels", version, about)]
pub struct Cli {
    /// Roster and naming configuration (TOML). Built-in defaults apply when omitted
    #[arg(long, global = true, env = CONFIG_PATH_VAR)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: RootCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RootCommand {
    Reconcile(ReconcileCommand),
    Members(MembersCommand),
    Channels(ChannelsCommand),
}

impl Cli {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            RootCommand::Reconcile(cmd) => cmd.execute(ctx).await,
            RootCommand::Members(cmd) => cmd.execute(ctx).await,
            RootCommand::Channels(cmd) => cmd.execute(ctx).await,
        }
    }
}
