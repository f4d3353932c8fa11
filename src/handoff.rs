//! Getting a rendered document out of the process: saving it, showing it in
//! a viewer, and the export driver used by front ends.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::engine::{Engine, ensure_engine};
use crate::error::Error;
use crate::model::{PostRecord, RenderConfig, RenderedDocument};

/// Command used to display documents instead of the platform opener.
pub const VIEWER_ENV: &str = "POSTPDF_VIEWER";

static TRANSIENT_SEQ: AtomicU64 = AtomicU64::new(0);

pub fn save_to_file(engine: &Engine, doc: &RenderedDocument, path: &Path) -> Result<(), Error> {
    let bytes = engine.encode(doc)?;
    std::fs::write(path, &bytes)?;
    log::info!("Saved {} pages to {}", doc.page_count(), path.display());
    Ok(())
}

/// An encoded document parked in a temporary file for a viewer.
///
/// The file stays on disk until [`TransientDocument::revoke`] is called.
/// Dropping the handle does not remove it; forgetting to revoke leaks the file.
#[must_use = "the temporary file is only removed by revoke()"]
#[derive(Debug)]
pub struct TransientDocument {
    path: PathBuf,
}

impl TransientDocument {
    /// Encode `doc` into a fresh, uniquely named file in the temp directory.
    pub fn create(engine: &Engine, doc: &RenderedDocument) -> Result<Self, Error> {
        let bytes = engine.encode(doc)?;
        let seq = TRANSIENT_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("post-pdf-{}-{seq}.pdf", std::process::id()));
        std::fs::write(&path, &bytes)?;
        log::debug!("Wrote transient document {}", path.display());
        Ok(TransientDocument { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn revoke(self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Revoked transient document {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

fn viewer_command(path: &Path) -> Command {
    if let Some(viewer) = std::env::var_os(VIEWER_ENV).filter(|v| !v.is_empty()) {
        let mut cmd = Command::new(viewer);
        cmd.arg(path);
        return cmd;
    }

    #[cfg(target_os = "macos")]
    let cmd = {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    };

    #[cfg(target_os = "windows")]
    let cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let cmd = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    };

    cmd
}

/// Encode `doc` to a transient file and ask the host to display it.
///
/// The caller owns the returned handle and must revoke it once the viewer no
/// longer needs the file.
pub fn open_in_viewer(engine: &Engine, doc: &RenderedDocument) -> Result<TransientDocument, Error> {
    let transient = TransientDocument::create(engine, doc)?;
    if let Err(e) = viewer_command(transient.path()).spawn() {
        log::warn!("Could not launch viewer for {}: {e}", transient.path().display());
        transient.revoke()?;
        return Err(Error::Io(e));
    }
    log::info!("Opened {} in viewer", transient.path().display());
    Ok(transient)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Download(PathBuf),
    Preview,
}

#[derive(Debug)]
pub enum Export {
    Saved(PathBuf),
    Opened(TransientDocument),
}

/// Clears the generating flag however the export ends.
struct IdleGuard<'a>(&'a AtomicBool);

impl Drop for IdleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Front-end driver: renders a post and hands it off, tracking whether an
/// export is in flight.
pub struct Exporter<'e> {
    engine: Option<&'e Engine>,
    config: RenderConfig,
    generating: AtomicBool,
}

impl<'e> Exporter<'e> {
    /// Uses the process-wide engine, loading it on the first export.
    pub fn new(config: RenderConfig) -> Self {
        Exporter {
            engine: None,
            config,
            generating: AtomicBool::new(false),
        }
    }

    pub fn with_engine(engine: &'e Engine, config: RenderConfig) -> Self {
        Exporter {
            engine: Some(engine),
            config,
            generating: AtomicBool::new(false),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Render `post` and hand it off. One export runs at a time per
    /// exporter; a call made while another is in flight fails with
    /// [`Error::ExportInProgress`] and leaves the running one untouched.
    pub fn export(&self, post: &PostRecord, action: Action) -> Result<Export, Error> {
        if self.generating.swap(true, Ordering::AcqRel) {
            log::warn!("Export of {:?} refused, another export is running", post.slug);
            return Err(Error::ExportInProgress);
        }
        let _idle = IdleGuard(&self.generating);

        let result = self.run(post, action);
        if let Err(e) = &result {
            log::error!("Failed to generate PDF for {:?}: {e}", post.slug);
        }
        result
    }

    fn run(&self, post: &PostRecord, action: Action) -> Result<Export, Error> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => ensure_engine()?,
        };
        let doc = engine.render(post, &self.config)?;
        match action {
            Action::Download(path) => {
                save_to_file(engine, &doc, &path)?;
                Ok(Export::Saved(path))
            }
            Action::Preview => open_in_viewer(engine, &doc).map(Export::Opened),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, PostStatus};

    fn record() -> PostRecord {
        let at = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:00:00Z").unwrap();
        PostRecord {
            id: 1,
            title: "Busy".to_string(),
            slug: "busy".to_string(),
            content: "Body".to_string(),
            summary: String::new(),
            thumbnail: None,
            category: "Rust".to_string(),
            tags: Vec::new(),
            views: 0,
            is_featured: false,
            status: PostStatus::Published,
            created_at: at,
            updated_at: at,
            author: Author {
                id: 1,
                name: "John Doe".to_string(),
                avatar: None,
            },
        }
    }

    #[test]
    fn overlapping_export_is_refused() {
        let engine = Engine::builtin();
        let exporter = Exporter::with_engine(&engine, RenderConfig::default());
        let path = std::env::temp_dir().join("post-pdf-overlap.pdf");
        let _ = std::fs::remove_file(&path);

        // Another export holds the flag.
        exporter.generating.store(true, Ordering::Release);
        let result = exporter.export(&record(), Action::Download(path.clone()));
        assert!(matches!(result, Err(Error::ExportInProgress)));
        assert!(exporter.is_generating());
        assert!(!path.exists());

        exporter.generating.store(false, Ordering::Release);
        assert!(exporter.export(&record(), Action::Download(path.clone())).is_ok());
        assert!(!exporter.is_generating());
        let _ = std::fs::remove_file(&path);
    }
}
