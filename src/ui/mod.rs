//! DOM wiring for the editor widget.
//!
//! Everything here runs on the browser's single event loop: input events and
//! the load/export completions mutate the shared `EditorState` one at a time
//! and re-render the preview synchronously. The mounted app owns its event
//! closures, so tearing it down drops them instead of leaving callbacks that
//! fire against discarded state.

use std::cell::RefCell;
use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement, HtmlStyleElement};

use crate::assets::{self, FontHandle};
use crate::document::Document;
use crate::editor::{self, BackgroundState, EditorState, ExportStatus};
use crate::export;
use crate::util::Color;

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// A mounted editor instance.
pub struct EditorApp {
    state: Rc<RefCell<EditorState>>,
    font: Rc<FontHandle>,
    dom: Rc<Dom>,
    _listeners: Vec<Listener>,
}

struct Dom {
    container: Element,
    input1: HtmlInputElement,
    input2: HtmlInputElement,
    preview: Element,
    status: Element,
    save: HtmlButtonElement,
}

impl EditorApp {
    /// Builds the form, preview and save button inside the element with
    /// `container_id` and kicks off the background load.
    pub fn mount(container_id: &str) -> Result<EditorApp, JsValue> {
        let dom_document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        let container = dom_document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{container_id}`")))?;

        let font = Rc::new(
            FontHandle::register(assets::DISPLAY_FONT)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        );
        inject_font_face(&dom_document, &font)?;

        let state = Rc::new(RefCell::new(EditorState::new()));

        let (wrap1, input1) = labeled_input(
            &dom_document,
            "text-line-1",
            "Text 1",
            &state.borrow().text1,
        )?;
        let (wrap2, input2) = labeled_input(
            &dom_document,
            "text-line-2",
            "Text 2",
            &state.borrow().text2,
        )?;

        let preview = dom_document.create_element("div")?;
        let status = dom_document.create_element("p")?;
        let save: HtmlButtonElement = dom_document
            .create_element("button")?
            .dyn_into()
            .map_err(|_| "not a button element")?;
        save.set_text_content(Some("Save Image"));

        container.append_child(&wrap1)?;
        container.append_child(&wrap2)?;
        container.append_child(&preview)?;
        container.append_child(&status)?;
        container.append_child(&save)?;

        let dom = Rc::new(Dom {
            container,
            input1,
            input2,
            preview,
            status,
            save,
        });

        let listeners = vec![
            attach_text_listener(
                dom.input1.clone(),
                state.clone(),
                dom.clone(),
                font.clone(),
                TextField::First,
            )?,
            attach_text_listener(
                dom.input2.clone(),
                state.clone(),
                dom.clone(),
                font.clone(),
                TextField::Second,
            )?,
            attach_save_listener(state.clone(), dom.clone(), font.clone())?,
        ];

        redraw(&dom, &state.borrow(), &font);

        // The load completes on a later turn of the event loop; the state
        // transition and the dimensions become visible together.
        state.borrow_mut().begin_background_load();
        {
            let state = state.clone();
            let dom = dom.clone();
            let font = font.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = editor::load_background(assets::BACKGROUND_PNG);
                state.borrow_mut().finish_background_load(result);
                redraw(&dom, &state.borrow(), &font);
            });
        }

        log::info!("editor mounted into `{container_id}`");
        Ok(EditorApp {
            state,
            font,
            dom,
            _listeners: listeners,
        })
    }

    pub fn set_text1(&self, value: &str) {
        self.state.borrow_mut().text1 = value.to_string();
        self.redraw();
    }

    pub fn set_text2(&self, value: &str) {
        self.state.borrow_mut().text2 = value.to_string();
        self.redraw();
    }

    /// Accepts a `#RRGGBB` color; returns false (and changes nothing) for
    /// anything else.
    pub fn set_font_color(&self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => {
                self.state.borrow_mut().font_color = color;
                self.redraw();
                true
            }
            None => false,
        }
    }

    pub fn set_font_size(&self, px: u32) {
        self.state.borrow_mut().font_size = px;
        self.redraw();
    }

    pub fn text1(&self) -> String {
        self.state.borrow().text1.clone()
    }

    pub fn text2(&self) -> String {
        self.state.borrow().text2.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().can_export()
    }

    /// Programmatic equivalent of clicking the save button.
    pub fn save(&self) {
        spawn_export(self.state.clone(), self.dom.clone(), self.font.clone());
    }

    /// Clears the container and drops the event closures.
    pub fn unmount(self) {
        self.dom.container.set_inner_html("");
        log::info!("editor unmounted");
    }

    fn redraw(&self) {
        redraw(&self.dom, &self.state.borrow(), &self.font);
    }
}

enum TextField {
    First,
    Second,
}

fn attach_text_listener(
    input: HtmlInputElement,
    state: Rc<RefCell<EditorState>>,
    dom: Rc<Dom>,
    font: Rc<FontHandle>,
    field: TextField,
) -> Result<Listener, JsValue> {
    let listener: Listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some(target) = event.target() else {
            return;
        };
        let Ok(edited) = target.dyn_into::<HtmlInputElement>() else {
            return;
        };
        {
            let mut state = state.borrow_mut();
            match field {
                TextField::First => state.text1 = edited.value(),
                TextField::Second => state.text2 = edited.value(),
            }
        }
        redraw(&dom, &state.borrow(), &font);
    }) as Box<dyn FnMut(_)>);
    input.add_event_listener_with_callback("input", listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

fn attach_save_listener(
    state: Rc<RefCell<EditorState>>,
    dom: Rc<Dom>,
    font: Rc<FontHandle>,
) -> Result<Listener, JsValue> {
    let save = dom.save.clone();
    let listener: Listener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        spawn_export(state.clone(), dom.clone(), font.clone());
    }) as Box<dyn FnMut(_)>);
    save.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

/// Runs the export pipeline and triggers the download, reporting failures
/// through the status line and leaving the button enabled for a retry.
fn spawn_export(state: Rc<RefCell<EditorState>>, dom: Rc<Dom>, font: Rc<FontHandle>) {
    if !state.borrow().can_export() {
        return;
    }
    state.borrow_mut().export = ExportStatus::Running;
    redraw(&dom, &state.borrow(), &font);

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = {
            let state = state.borrow();
            let doc = Document::compose(&state, &font);
            export::export_png(&doc, &font, export::bundled_asset)
        };
        match outcome {
            Ok(png) => match trigger_download(&png) {
                Ok(()) => state.borrow_mut().export = ExportStatus::Idle,
                Err(e) => {
                    log::error!("download failed: {e:?}");
                    state.borrow_mut().export =
                        ExportStatus::Failed("the download could not be started".to_string());
                }
            },
            Err(e) => {
                log::error!("export failed: {e}");
                state.borrow_mut().export = ExportStatus::Failed(e.to_string());
            }
        }
        redraw(&dom, &state.borrow(), &font);
    });
}

fn redraw(dom: &Dom, state: &EditorState, font: &FontHandle) {
    let doc = Document::compose(state, font);
    dom.preview.set_inner_html(&doc.to_svg());
    dom.save.set_disabled(!state.can_export());

    let status = match (&state.background, &state.export) {
        (BackgroundState::Failed(reason), _) => format!("Background failed to load: {reason}"),
        (_, ExportStatus::Failed(reason)) => format!("Export failed: {reason}"),
        (BackgroundState::Idle | BackgroundState::Loading, _) => {
            "Loading background...".to_string()
        }
        (_, ExportStatus::Running) => "Exporting...".to_string(),
        (BackgroundState::Ready(_), ExportStatus::Idle) => String::new(),
    };
    dom.status.set_text_content(Some(&status));
}

/// Hands the PNG bytes to the browser as a named download; no server
/// round-trip involved.
fn trigger_download(png: &[u8]) -> Result<(), JsValue> {
    let dom_document = web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let anchor: web_sys::HtmlAnchorElement = dom_document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| "not an anchor element")?;
    anchor.set_href(&format!("data:image/png;base64,{}", STANDARD.encode(png)));
    anchor.set_download(export::EXPORT_FILE_NAME);
    anchor.click();
    Ok(())
}

fn inject_font_face(dom_document: &web_sys::Document, font: &FontHandle) -> Result<(), JsValue> {
    let style: HtmlStyleElement = dom_document
        .create_element("style")?
        .dyn_into()
        .map_err(|_| "not a style element")?;
    style.set_text_content(Some(&format!(
        "@font-face {{ font-family: \"{}\"; src: url(\"{}\"); }}",
        font.family(),
        assets::font_data_url(assets::DISPLAY_FONT),
    )));
    dom_document
        .head()
        .ok_or("no document head")?
        .append_child(&style)?;
    Ok(())
}

fn labeled_input(
    dom_document: &web_sys::Document,
    id: &str,
    label: &str,
    value: &str,
) -> Result<(Element, HtmlInputElement), JsValue> {
    let wrap = dom_document.create_element("div")?;
    let caption = dom_document.create_element("label")?;
    caption.set_attribute("for", id)?;
    caption.set_text_content(Some(label));

    let input: HtmlInputElement = dom_document
        .create_element("input")?
        .dyn_into()
        .map_err(|_| "not an input element")?;
    input.set_id(id);
    input.set_type("text");
    input.set_value(value);
    input.set_placeholder(&format!("Enter {}", label.to_lowercase()));

    wrap.append_child(&caption)?;
    wrap.append_child(&input)?;
    Ok((wrap, input))
}
