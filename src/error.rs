use thiserror::Error;

/// Failures while bringing a bundled asset into a usable form.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("background image could not be decoded: {0}")]
    BackgroundDecode(String),
    #[error("display font has no readable face")]
    FontUnreadable,
}

/// Failures in the serialize-inline-rasterize-encode export pipeline.
///
/// Every variant is local to a single save action; the UI surfaces the
/// message and leaves the save button enabled for a retry.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no background image is loaded")]
    NoBackground,
    #[error("serialized document has no element for layer `{0}`")]
    MissingLayer(String),
    #[error("serialized element for layer `{0}` has no href attribute")]
    MalformedElement(String),
    #[error("no embeddable source for image layer `{0}`")]
    MissingImageSource(String),
    #[error("rasterizer rejected the document: {0}")]
    SvgParse(String),
    #[error("could not allocate a {0}x{1} raster surface")]
    Surface(u32, u32),
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}
