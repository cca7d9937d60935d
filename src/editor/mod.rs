//! The single source of truth for the widget.
//!
//! `EditorState` owns the two text lines, the font settings, the background
//! slot and the export status. It is mutated only from input events and from
//! the background-load completion, one at a time; the preview and the
//! exported PNG are pure functions of it.

use resvg::tiny_skia::Pixmap;

use crate::assets;
use crate::error::LoadError;
use crate::util::Color;

pub const DEFAULT_TEXT1: &str = "Homelander";
pub const DEFAULT_TEXT2: &str = "In Engineering Science";
pub const DEFAULT_FONT_SIZE: u32 = 42;
pub const SECONDARY_FONT_SIZE: u32 = 30;
pub const DEFAULT_FONT_COLOR: Color = Color::rgb(0x14, 0x15, 0x38);

/// A decoded background image: the address the preview `href` points at plus
/// the natural pixel dimensions. The three always travel together, so the
/// canvas size can never be observed without the image (or vice versa).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundImage {
    pub address: String,
    pub width: u32,
    pub height: u32,
}

/// Lifecycle of the background slot.
#[derive(Clone, Debug, Default)]
pub enum BackgroundState {
    #[default]
    Idle,
    Loading,
    Ready(BackgroundImage),
    Failed(String),
}

/// Outcome of the most recent save action, surfaced in the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportStatus {
    #[default]
    Idle,
    Running,
    Failed(String),
}

pub struct EditorState {
    pub text1: String,
    pub text2: String,
    pub font_size: u32,
    pub secondary_font_size: u32,
    pub font_color: Color,
    pub background: BackgroundState,
    pub export: ExportStatus,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> EditorState {
        EditorState {
            text1: DEFAULT_TEXT1.to_string(),
            text2: DEFAULT_TEXT2.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            secondary_font_size: SECONDARY_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR,
            background: BackgroundState::Idle,
            export: ExportStatus::Idle,
        }
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        match &self.background {
            BackgroundState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Canvas dimensions, present exactly when the background is ready.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.background_image()
            .map(|image| (image.width, image.height))
    }

    /// Exporter precondition: the save action is disabled entirely while
    /// this is false, not merely a no-op.
    pub fn can_export(&self) -> bool {
        self.background_image().is_some()
    }

    pub fn begin_background_load(&mut self) {
        self.background = BackgroundState::Loading;
    }

    /// Publishes the load outcome in a single transition.
    pub fn finish_background_load(&mut self, result: Result<BackgroundImage, LoadError>) {
        match result {
            Ok(image) => {
                log::info!("background ready: {}x{}", image.width, image.height);
                self.background = BackgroundState::Ready(image);
            }
            Err(e) => {
                log::error!("background load failed: {e}");
                self.background = BackgroundState::Failed(e.to_string());
            }
        }
    }
}

/// Decodes the background asset and produces its handle.
///
/// The address is the self-contained `data:` form of the same bytes, so the
/// preview never depends on an external fetch either.
pub fn load_background(bytes: &[u8]) -> Result<BackgroundImage, LoadError> {
    let pixmap =
        Pixmap::decode_png(bytes).map_err(|e| LoadError::BackgroundDecode(e.to_string()))?;
    Ok(BackgroundImage {
        address: assets::png_data_url(bytes),
        width: pixmap.width(),
        height: pixmap.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let pixmap = Pixmap::new(width, height).unwrap();
        pixmap.encode_png().unwrap()
    }

    #[test]
    fn canvas_size_tracks_background_exactly() {
        let mut state = EditorState::new();
        assert_eq!(state.canvas_size(), None);

        state.begin_background_load();
        assert_eq!(state.canvas_size(), None);

        state.finish_background_load(load_background(&encoded_png(800, 600)));
        assert_eq!(state.canvas_size(), Some((800, 600)));
    }

    #[test]
    fn loading_the_same_bytes_is_idempotent() {
        let bytes = encoded_png(320, 200);
        let first = load_background(&bytes).unwrap();
        let second = load_background(&bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn export_is_gated_on_background_not_text() {
        let mut state = EditorState::new();
        assert!(!state.can_export());

        state.text1.clear();
        state.text2.clear();
        state.begin_background_load();
        assert!(!state.can_export());

        state.finish_background_load(Err(LoadError::BackgroundDecode("truncated".into())));
        assert!(!state.can_export());
        assert!(matches!(state.background, BackgroundState::Failed(_)));

        state.finish_background_load(load_background(&encoded_png(10, 10)));
        assert!(state.can_export());
    }

    #[test]
    fn undecodable_background_reports_a_cause() {
        let err = load_background(b"not a png").unwrap_err();
        assert!(matches!(err, LoadError::BackgroundDecode(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn bundled_background_decodes() {
        let image = load_background(assets::BACKGROUND_PNG).unwrap();
        assert!(image.width > 0 && image.height > 0);
        assert!(image.address.starts_with("data:image/png;base64,"));
    }
}
