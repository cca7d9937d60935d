//! A browser widget that overlays two lines of text on a bundled certificate
//! image and exports the composite as a PNG download.
//!
//! The pure core (state, document composition, export pipeline) is host
//! independent; the DOM layer and the `wasm-bindgen` entry points below only
//! exist on `wasm32`.

pub mod assets;
pub mod document;
pub mod editor;
pub mod error;
pub mod export;
#[cfg(target_arch = "wasm32")]
pub mod ui;
pub mod util;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Element id the parameterless [`start`] entry point mounts into.
#[cfg(target_arch = "wasm32")]
pub const DEFAULT_CONTAINER_ID: &str = "image-editor";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::Output::call(console_log::log))
        .apply();
}

// The editor mounted by `start`. The page owns exactly one; keeping it here
// keeps its event closures alive for the page lifetime.
#[cfg(target_arch = "wasm32")]
thread_local! {
    static MOUNTED: std::cell::RefCell<Option<ui::EditorApp>> =
        const { std::cell::RefCell::new(None) };
}

/// Mount the editor into the element with id `image-editor`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start() {
    log::info!("starting certificate editor");
    match ui::EditorApp::mount(DEFAULT_CONTAINER_ID) {
        Ok(app) => MOUNTED.with(|slot| *slot.borrow_mut() = Some(app)),
        Err(e) => log::error!("failed to mount editor: {e:?}"),
    }
}

/// Tear down the editor mounted by [`start`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop() {
    if let Some(app) = MOUNTED.with(|slot| slot.borrow_mut().take()) {
        app.unmount();
    }
}

/// Standalone editor handle for host pages that want more control
///
/// Use this instead of [`start`] to mount into a custom container and drive
/// the widget programmatically.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ImageEditor {
    app: ui::EditorApp,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ImageEditor {
    /// Create an editor inside the element with the given id.
    #[wasm_bindgen]
    pub fn create(container_id: &str) -> Result<ImageEditor, JsValue> {
        Ok(ImageEditor {
            app: ui::EditorApp::mount(container_id)?,
        })
    }

    /// Set the primary text line.
    #[wasm_bindgen]
    pub fn set_text1(&self, value: &str) {
        self.app.set_text1(value);
    }

    /// Set the secondary text line.
    #[wasm_bindgen]
    pub fn set_text2(&self, value: &str) {
        self.app.set_text2(value);
    }

    /// Set the shared font color from a `#RRGGBB` string.
    #[wasm_bindgen]
    pub fn set_font_color(&self, hex: &str) -> bool {
        self.app.set_font_color(hex)
    }

    /// Set the primary font size in pixels.
    #[wasm_bindgen]
    pub fn set_font_size(&self, px: u32) {
        self.app.set_font_size(px);
    }

    /// Get the primary text line.
    #[wasm_bindgen]
    pub fn text1(&self) -> String {
        self.app.text1()
    }

    /// Get the secondary text line.
    #[wasm_bindgen]
    pub fn text2(&self) -> String {
        self.app.text2()
    }

    /// Whether the background is loaded and the save action is available.
    #[wasm_bindgen]
    pub fn is_ready(&self) -> bool {
        self.app.is_ready()
    }

    /// Export the current composite and trigger the download.
    #[wasm_bindgen]
    pub fn save(&self) {
        self.app.save();
    }

    /// Remove the editor from the page.
    #[wasm_bindgen]
    pub fn unmount(self) {
        self.app.unmount();
    }
}
