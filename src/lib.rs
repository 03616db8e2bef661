pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod intake;
pub mod logging;
pub mod overlay;
pub mod probe;
pub mod state;
pub mod svg;
use std::path::Path;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use overlay::{OverlayController, OverlayFrame};

/// Builds an overlay for the image at `path` and waits for its natural size.
///
/// A probe that fails or times out leaves the overlay at its default size.
pub fn open_overlay(path: &Path, config: &AppConfig) -> AppResult<OverlayController> {
    let mime = intake::mime_for_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let image_data = intake::IntakeSource::File {
        mime: mime.to_string(),
        bytes,
    }
    .into_data_url()?;

    let message = intake::IntakeMessage::AddImage { image_data };
    let mut overlay = OverlayController::from_message(message, || {});
    overlay.start_probe(config.probe_timeout());
    let status = overlay.wait_for_probe();
    tracing::info!(path = %path.display(), ?status, "overlay ready");
    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn open_overlay_adopts_natural_png_size() {
        let path = std::env::temp_dir().join(format!("snaplayer-open-{}.png", std::process::id()));
        std::fs::write(&path, probe::tests::png_bytes(64, 32)).expect("png should be writable");

        let overlay = open_overlay(&path, &AppConfig::default()).expect("png should open");
        assert_eq!(overlay.state().size, Size::new(64.0, 32.0));
        assert_eq!(overlay.state().aspect_ratio, 2.0);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn open_overlay_rejects_unknown_extensions() {
        let error = open_overlay(Path::new("notes.txt"), &AppConfig::default()).unwrap_err();
        assert!(matches!(error, AppError::Intake(_)));
    }
}
