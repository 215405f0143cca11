/*
 * Responsibility
 * - start the tokio runtime
 * - call app::run() (no logic lives here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bonbonniere_api::app::run().await
}
