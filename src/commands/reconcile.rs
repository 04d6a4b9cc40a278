use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use crate::app::AppContext;
use crate::commands::CliCommand;
use crate::config::ExistingPolicy;
use crate::reconcile::{Mode, Reconciler};
use crate::support::print::print_report;

/// Create, archive and refill the per-member board channels
#[derive(Args, Debug, Clone)]
pub struct ReconcileCommand {
    /// Log what would change without touching the workspace
    #[arg(long, alias = "dryrun")]
    pub dry_run: bool,

    /// Leave existing channels untouched instead of archiving and recreating them
    #[arg(long)]
    pub keep_existing: bool,
}

#[async_trait]
impl CliCommand for ReconcileCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let config = ctx.config()?;
        let client = ctx.slack_client()?;
        let mode = if self.dry_run {
            Mode::DryRun
        } else {
            Mode::Apply
        };

        let mut reconciler = Reconciler::new(&client, config, mode);
        if self.keep_existing {
            reconciler = reconciler.with_policy(ExistingPolicy::Keep);
        }

        let report = reconciler.reconcile_workspace().await?;
        print_report(&report);
        Ok(())
    }
}
