//! Bundled assets and their startup-time registration.
//!
//! The background image and the display font ship inside the wasm binary so
//! the editor works with zero network round-trips. The font is registered
//! once into a read-only [`fontdb::Database`]; the family name that the face
//! reports feeds both the DOM `@font-face` rule and the rasterizer, so the
//! preview and the exported PNG agree on the typeface.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use resvg::usvg::fontdb;

use crate::error::LoadError;

/// The fixed certificate background. Not user-replaceable.
pub const BACKGROUND_PNG: &[u8] = include_bytes!("../../assets/certificate.png");

/// The display typeface used by both text layers.
pub const DISPLAY_FONT: &[u8] = include_bytes!("../../assets/EngraversDisplay.ttf");

/// Wraps PNG bytes as a self-contained `data:` URL.
pub fn png_data_url(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Wraps font bytes as a `data:` URL for a CSS `@font-face` rule.
pub fn font_data_url(bytes: &[u8]) -> String {
    format!("data:font/ttf;base64,{}", STANDARD.encode(bytes))
}

/// Read-only handle to the registered display font.
///
/// Created once at startup and shared by the preview renderer and the
/// exporter; nothing mutates the database afterwards.
pub struct FontHandle {
    family: String,
    db: Arc<fontdb::Database>,
}

impl FontHandle {
    /// Registers `bytes` as the display font and records the family name the
    /// face actually reports.
    pub fn register(bytes: &[u8]) -> Result<FontHandle, LoadError> {
        let mut db = fontdb::Database::new();
        db.load_font_data(bytes.to_vec());
        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or(LoadError::FontUnreadable)?;
        log::info!("registered display font family `{family}`");
        Ok(FontHandle {
            family,
            db: Arc::new(db),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn database(&self) -> Arc<fontdb::Database> {
        self.db.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_font_registers_with_a_family() {
        let font = FontHandle::register(DISPLAY_FONT).unwrap();
        assert!(!font.family().is_empty());
        assert!(font.database().faces().next().is_some());
    }

    #[test]
    fn garbage_font_is_rejected() {
        assert!(matches!(
            FontHandle::register(b"definitely not a font"),
            Err(LoadError::FontUnreadable)
        ));
    }

    #[test]
    fn data_urls_are_prefixed_and_padded() {
        let url = png_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(font_data_url(&[1, 2, 3]).starts_with("data:font/ttf;base64,"));
    }
}
