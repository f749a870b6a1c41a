use anyhow::Result;

use finboard::config::Settings;
use finboard::logging::init_logging;
use finboard::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    settings.validate().map_err(anyhow::Error::msg)?;

    let (log_path, _guard) = init_logging(settings.log_dir.as_deref())?;
    tracing::info!("Logging to {}", log_path.display());

    App::new(settings).run().await?;

    Ok(())
}
