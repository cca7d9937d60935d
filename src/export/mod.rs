//! The export pipeline: serialize the document, inline image hrefs, run the
//! SVG rasterizer, encode PNG bytes.
//!
//! The rasterizer cannot fetch external resources, so every image href in
//! the serialized text is replaced with a self-contained `data:` form before
//! parsing. Substitution is keyed by the layer id each `<image>` element
//! carries, so a document with several image layers substitutes each one
//! independently.

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::assets::{self, FontHandle};
use crate::document::{self, Document};
use crate::error::ExportError;

/// Fixed name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "edited_image.png";

/// Resolves an image layer id to the self-contained form of its asset.
/// The only layer the widget composes is the bundled background.
pub fn bundled_asset(layer_id: &str) -> Option<String> {
    match layer_id {
        document::BACKGROUND_LAYER => Some(assets::png_data_url(assets::BACKGROUND_PNG)),
        _ => None,
    }
}

/// Runs the full pipeline and returns the PNG bytes.
///
/// The caller triggers the actual download; the bytes are not retained.
pub fn export_png(
    document: &Document,
    font: &FontHandle,
    resolve: impl Fn(&str) -> Option<String>,
) -> Result<Vec<u8>, ExportError> {
    if document.is_empty() {
        return Err(ExportError::NoBackground);
    }

    let svg = document.to_svg();
    let svg = inline_image_hrefs(&svg, document, resolve)?;
    log::debug!("rasterizing {} byte document", svg.len());

    let pixmap = rasterize(&svg, document.width(), document.height(), font)?;
    pixmap
        .encode_png()
        .map_err(|e| ExportError::PngEncode(e.to_string()))
}

/// Replaces the href of every image layer in the serialized text with its
/// embeddable form, keyed by the `data-layer` id the serializer wrote.
fn inline_image_hrefs(
    svg: &str,
    document: &Document,
    resolve: impl Fn(&str) -> Option<String>,
) -> Result<String, ExportError> {
    let mut out = svg.to_string();
    for layer in document.image_layers() {
        let marker = format!("data-layer=\"{}\"", layer.id);
        let marker_at = out
            .find(&marker)
            .ok_or_else(|| ExportError::MissingLayer(layer.id.to_string()))?;

        // The attribute span of this element only: from its opening `<` to
        // the next `>`.
        let element_start = out[..marker_at].rfind('<').unwrap_or(0);
        let element_end = marker_at
            + out[marker_at..]
                .find('>')
                .ok_or_else(|| ExportError::MalformedElement(layer.id.to_string()))?;

        let href_at = out[element_start..element_end]
            .find("href=\"")
            .ok_or_else(|| ExportError::MalformedElement(layer.id.to_string()))?;
        let value_start = element_start + href_at + "href=\"".len();
        let value_end = value_start
            + out[value_start..]
                .find('"')
                .ok_or_else(|| ExportError::MalformedElement(layer.id.to_string()))?;

        let inline =
            resolve(layer.id).ok_or_else(|| ExportError::MissingImageSource(layer.id.to_string()))?;
        out.replace_range(value_start..value_end, &inline);
    }
    Ok(out)
}

fn rasterize(svg: &str, width: u32, height: u32, font: &FontHandle) -> Result<Pixmap, ExportError> {
    let mut options = usvg::Options::default();
    options.fontdb = font.database();

    let tree =
        usvg::Tree::from_str(svg, &options).map_err(|e| ExportError::SvgParse(e.to_string()))?;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Surface(width, height))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}
