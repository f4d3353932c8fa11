mod engine;
mod error;
mod fonts;
pub mod handoff;
pub mod layout;
pub mod markup;
mod model;
mod pdf;
pub mod posts;
pub mod session;
pub mod validate;

pub use engine::{BOLD_FONT_ENV, Engine, FONT_ENV, ensure_engine};
pub use error::Error;
pub use fonts::FontFace;
pub use model::{
    Author, FontSizes, GlyphRun, Page, PostRecord, PostStatus, RenderConfig, RenderedDocument,
    Watermark, Weight,
};

use std::path::Path;

/// Lay out `post` with the process-wide engine.
pub fn render(post: &PostRecord, config: &RenderConfig) -> Result<RenderedDocument, Error> {
    ensure_engine()?.render(post, config)
}

pub fn load_post(path: &Path) -> Result<PostRecord, Error> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

pub fn convert_post_to_pdf(
    post: &PostRecord,
    config: &RenderConfig,
    output: &Path,
) -> Result<(), Error> {
    let engine = ensure_engine()?;
    let doc = engine.render(post, config)?;
    handoff::save_to_file(engine, &doc, output)
}
