//! The rendered document: an image layer plus up to two text layers.
//!
//! [`Document::compose`] is a pure function of the editor state; it is
//! recomputed on every state change and never persisted. [`Document::to_svg`]
//! serializes it to the SVG text that both the live preview and the export
//! pipeline consume.

use std::fmt::Write as _;

use crate::assets::FontHandle;
use crate::editor::EditorState;
use crate::util::Color;

/// Identifier of the single background image layer. Image layers carry their
/// id into the serialized text (as `data-layer`) so the exporter can key
/// href substitution on it instead of matching the first href it sees.
pub const BACKGROUND_LAYER: &str = "background";

/// Vertical baseline of the primary text line, in image pixels.
pub const TEXT1_BASELINE_Y: f32 = 320.0;
/// Vertical baseline of the secondary text line, in image pixels.
pub const TEXT2_BASELINE_Y: f32 = 485.0;

const TEXT_WEIGHT: u32 = 800;

#[derive(Clone, Debug)]
pub struct ImageLayer {
    pub id: &'static str,
    pub href: String,
}

#[derive(Clone, Debug)]
pub struct TextLayer {
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub size: u32,
    pub weight: u32,
    pub color: Color,
    pub family: String,
}

#[derive(Clone, Debug)]
pub enum Layer {
    Image(ImageLayer),
    Text(TextLayer),
}

/// The vector container: layers positioned inside a viewport sized to the
/// background's natural dimensions.
#[derive(Clone, Debug)]
pub struct Document {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
}

impl Document {
    /// A document with zero extent and no layers; what the preview shows
    /// before the background is ready.
    pub fn empty() -> Document {
        Document {
            width: 0,
            height: 0,
            layers: Vec::new(),
        }
    }

    /// Composes the current state into layers. Degrades to fewer layers
    /// rather than failing: no background means no layers at all, an empty
    /// text line is simply omitted.
    pub fn compose(state: &EditorState, font: &FontHandle) -> Document {
        let Some(image) = state.background_image() else {
            return Document::empty();
        };

        let mut layers = vec![Layer::Image(ImageLayer {
            id: BACKGROUND_LAYER,
            href: image.address.clone(),
        })];

        let center_x = image.width as f32 / 2.0;
        let text_layer = |content: &str, y: f32, size: u32| {
            Layer::Text(TextLayer {
                content: content.to_string(),
                x: center_x,
                y,
                size,
                weight: TEXT_WEIGHT,
                color: state.font_color,
                family: font.family().to_string(),
            })
        };
        if !state.text1.is_empty() {
            layers.push(text_layer(&state.text1, TEXT1_BASELINE_Y, state.font_size));
        }
        if !state.text2.is_empty() {
            layers.push(text_layer(
                &state.text2,
                TEXT2_BASELINE_Y,
                state.secondary_font_size,
            ));
        }

        Document {
            width: image.width,
            height: image.height,
            layers,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn image_layers(&self) -> impl Iterator<Item = &ImageLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Image(image) => Some(image),
            Layer::Text(_) => None,
        })
    }

    pub fn text_layers(&self) -> impl Iterator<Item = &TextLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Text(text) => Some(text),
            Layer::Image(_) => None,
        })
    }

    /// Serializes the document to an SVG string.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height,
        );
        for layer in &self.layers {
            match layer {
                Layer::Image(image) => {
                    let _ = write!(
                        svg,
                        "<image data-layer=\"{}\" href=\"{}\" width=\"{}\" height=\"{}\"/>",
                        image.id,
                        xml_escape(&image.href),
                        self.width,
                        self.height,
                    );
                }
                Layer::Text(text) => {
                    let _ = write!(
                        svg,
                        "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" font-weight=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
                        fmt_scalar(text.x),
                        fmt_scalar(text.y),
                        xml_escape(&text.family),
                        text.size,
                        text.color.to_hex(),
                        text.weight,
                        xml_escape(&text.content),
                    );
                }
            }
        }
        svg.push_str("</svg>");
        svg
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes integral values without a fraction and trims trailing zeros
/// otherwise, keeping the serialized text stable.
fn fmt_scalar(v: f32) -> String {
    if v == v.trunc() {
        return format!("{}", v as i64);
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;
    use crate::editor::{BackgroundImage, EditorState};

    fn display_font() -> FontHandle {
        FontHandle::register(assets::DISPLAY_FONT).unwrap()
    }

    fn ready_state(width: u32, height: u32) -> EditorState {
        let mut state = EditorState::new();
        state.finish_background_load(Ok(BackgroundImage {
            address: "assets/certificate.png".to_string(),
            width,
            height,
        }));
        state
    }

    #[test]
    fn no_background_means_zero_extent_and_no_layers() {
        let doc = Document::compose(&EditorState::new(), &display_font());
        assert!(doc.is_empty());
        assert_eq!((doc.width(), doc.height()), (0, 0));
    }

    #[test]
    fn one_text_layer_per_nonempty_field() {
        let font = display_font();
        let mut state = ready_state(800, 600);

        let doc = Document::compose(&state, &font);
        assert_eq!(doc.image_layers().count(), 1);
        assert_eq!(doc.text_layers().count(), 2);

        state.text2.clear();
        let doc = Document::compose(&state, &font);
        assert_eq!(doc.image_layers().count(), 1);
        assert_eq!(doc.text_layers().count(), 1);
        assert_eq!(doc.text_layers().next().unwrap().content, state.text1);

        state.text1.clear();
        let doc = Document::compose(&state, &font);
        assert_eq!(doc.text_layers().count(), 0);
        assert_eq!(doc.image_layers().count(), 1);
    }

    #[test]
    fn layout_follows_the_fixed_offsets() {
        let doc = Document::compose(&ready_state(800, 600), &display_font());
        let texts: Vec<_> = doc.text_layers().collect();
        assert_eq!(texts[0].x, 400.0);
        assert_eq!(texts[0].y, TEXT1_BASELINE_Y);
        assert_eq!(texts[0].size, 42);
        assert_eq!(texts[1].y, TEXT2_BASELINE_Y);
        assert_eq!(texts[1].size, 30);
        assert_eq!(texts[0].weight, 800);
    }

    #[test]
    fn color_change_recolors_text_only() {
        let font = display_font();
        let mut state = ready_state(800, 600);
        let before = Document::compose(&state, &font);

        state.font_color = Color::from_hex("#FF0000").unwrap();
        let after = Document::compose(&state, &font);

        for text in after.text_layers() {
            assert_eq!(text.color.to_hex(), "#ff0000");
        }
        let (b, a) = (
            before.image_layers().next().unwrap(),
            after.image_layers().next().unwrap(),
        );
        assert_eq!(b.href, a.href);
        let positions = |doc: &Document| -> Vec<(f32, f32)> {
            doc.text_layers().map(|t| (t.x, t.y)).collect()
        };
        assert_eq!(positions(&before), positions(&after));
    }

    #[test]
    fn serialization_carries_layer_ids_and_escapes_text() {
        let font = display_font();
        let mut state = ready_state(800, 600);
        state.text1 = "Ph&D <laude>".to_string();

        let svg = Document::compose(&state, &font).to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.contains("data-layer=\"background\""));
        assert!(svg.contains("href=\"assets/certificate.png\""));
        assert!(svg.contains("Ph&amp;D &lt;laude&gt;"));
        assert!(svg.contains("fill=\"#141538\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn scalars_serialize_without_noise() {
        assert_eq!(fmt_scalar(400.0), "400");
        assert_eq!(fmt_scalar(400.5), "400.5");
        assert_eq!(fmt_scalar(320.25), "320.25");
    }
}
