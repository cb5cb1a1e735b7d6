//! Destinations for encoded icon frames.
//!
//! A sink stands in for the page's icon `<link>` element. The element may be
//! missing; `Option<S>` models that, and publishing into `None` is a silent
//! no-op rather than an error.

use crate::error::Result;
use crate::output::EncodedIcon;
use std::path::{Path, PathBuf};

/// Receives each encoded frame.
pub trait IconSink {
    /// Publish a frame as the current icon.
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()>;
}

impl<S: IconSink + ?Sized> IconSink for &mut S {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        (**self).publish(icon)
    }
}

impl<S: IconSink + ?Sized> IconSink for Box<S> {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        (**self).publish(icon)
    }
}

impl<S: IconSink> IconSink for Option<S> {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        match self {
            Some(sink) => sink.publish(icon),
            None => Ok(()),
        }
    }
}

/// Publish to both sinks, first to second. Stops at the first error.
impl<A: IconSink, B: IconSink> IconSink for (A, B) {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        self.0.publish(icon)?;
        self.1.publish(icon)
    }
}

/// In-memory icon link: keeps the latest `href`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconLink {
    id: String,
    href: Option<String>,
    updates: u64,
}

impl IconLink {
    /// Element id the dynamic favicon is published to by default.
    pub const DEFAULT_ID: &'static str = "dynamic-favicon";

    /// Create a link element with the given id and no `href`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: None,
            updates: 0,
        }
    }

    /// Element id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latest published data URI.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Number of frames published.
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }
}

impl IconSink for IconLink {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        match &mut self.href {
            Some(href) => {
                href.clear();
                href.push_str(icon.data_uri());
            }
            None => self.href = Some(icon.data_uri().to_owned()),
        }
        self.updates += 1;
        Ok(())
    }
}

/// Writes each frame's PNG to a file, replacing the previous one.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    /// Sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IconSink for PngFileSink {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        // Readers never see a partially written file.
        let tmp = self.path.with_extension("png.tmp");
        std::fs::write(&tmp, icon.png())?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Prints each frame's data URI on its own line.
#[derive(Debug)]
pub struct UriWriter<W> {
    out: W,
}

impl<W: std::io::Write> UriWriter<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: std::io::Write> IconSink for UriWriter<W> {
    fn publish(&mut self, icon: &EncodedIcon) -> Result<()> {
        writeln!(self.out, "{}", icon.data_uri())?;
        Ok(())
    }
}
