use std::path::PathBuf;

use anyhow::{bail, Context};

fn main() -> anyhow::Result<()> {
    let config = snaplayer::config::load_app_config();
    snaplayer::logging::init(config.debug_logging);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: snaplayer <image-path>");
    };

    let overlay = snaplayer::open_overlay(&path, &config)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let frame = serde_json::to_string_pretty(&overlay.render())
        .context("failed to serialize overlay frame")?;
    println!("{frame}");
    Ok(())
}
