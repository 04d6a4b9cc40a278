use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::config;
use crate::slack::SlackClient;

pub struct AppContext {
    config_path: Option<PathBuf>,
    config: OnceCell<config::Config>,
}

impl AppContext {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            config: OnceCell::new(),
        }
    }

    pub fn config(&self) -> Result<&config::Config> {
        self.config
            .get_or_try_init(|| config::load_config(self.config_path.as_deref()))
    }

    pub fn slack_client(&self) -> Result<SlackClient> {
        let token = config::slack_token()?;
        Ok(SlackClient::with_base_url(token, config::api_base()))
    }
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config.clone());
    cli.execute(&ctx).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
