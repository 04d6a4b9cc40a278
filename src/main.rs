use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    board_channels::app::run().await
}
