use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::Error;
use crate::fonts::FontFace;
use crate::layout;
use crate::model::{PostRecord, RenderConfig, RenderedDocument, Weight};
use crate::pdf;

/// TrueType/OpenType file replacing Helvetica for body and metadata text.
pub const FONT_ENV: &str = "POSTPDF_FONT";
/// TrueType/OpenType file replacing Helvetica-Bold for the title.
pub const BOLD_FONT_ENV: &str = "POSTPDF_BOLD_FONT";

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Font metrics plus the PDF writer. Read-only once built.
#[derive(Debug)]
pub struct Engine {
    regular: FontFace,
    bold: FontFace,
}

impl Engine {
    /// Engine on the base-14 Helvetica faces. Never touches the filesystem.
    pub fn builtin() -> Self {
        Engine {
            regular: FontFace::helvetica(),
            bold: FontFace::helvetica_bold(),
        }
    }

    pub fn with_faces(regular: FontFace, bold: FontFace) -> Self {
        Engine { regular, bold }
    }

    /// Build from `POSTPDF_FONT` / `POSTPDF_BOLD_FONT`, defaulting each face
    /// to Helvetica when its variable is unset.
    pub fn from_env() -> Result<Self, Error> {
        let regular = match font_path(FONT_ENV) {
            Some(path) => FontFace::load(&path)?,
            None => FontFace::helvetica(),
        };
        let bold = match font_path(BOLD_FONT_ENV) {
            Some(path) => FontFace::load(&path)?,
            None => FontFace::helvetica_bold(),
        };
        Ok(Engine { regular, bold })
    }

    pub fn face(&self, weight: Weight) -> &FontFace {
        match weight {
            Weight::Normal => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    pub fn render(&self, post: &PostRecord, config: &RenderConfig) -> Result<RenderedDocument, Error> {
        layout::render(self, post, config)
    }

    pub fn encode(&self, doc: &RenderedDocument) -> Result<Vec<u8>, Error> {
        pdf::encode(doc, self)
    }
}

fn font_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// The process-wide engine, loaded on first call and cached afterwards.
///
/// A failed load is not cached, so a later call retries.
pub fn ensure_engine() -> Result<&'static Engine, Error> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }
    let engine = Engine::from_env()?;
    log::info!(
        "Document engine ready (regular: {}, bold: {})",
        engine.regular.name(),
        engine.bold.name()
    );
    Ok(ENGINE.get_or_init(|| engine))
}
