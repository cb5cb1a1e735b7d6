//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate, plus the base64 data URI
//! wrapping a browser accepts as a `<link rel="icon">` reference.

use crate::error::Result;
use crate::surface::Surface;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Write;

/// Prefix of every data URI produced by [`PngEncoder::to_data_uri`].
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// PNG encoder for surface output.
pub struct PngEncoder;

impl PngEncoder {
    /// Encode a surface to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(surface: &Surface) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode_into(surface, &mut buffer)?;
        Ok(buffer)
    }

    /// Encode a surface as a `data:image/png;base64,...` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_data_uri(surface: &Surface) -> Result<String> {
        Ok(EncodedIcon::new(Self::to_bytes(surface)?).data_uri)
    }

    fn encode_into<W: Write>(surface: &Surface, out: W) -> Result<()> {
        let mut encoder = png::Encoder::new(out, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(surface.pixels())?;
        writer.finish()?;

        Ok(())
    }
}

/// One encoded frame: the PNG bytes and their data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedIcon {
    png: Vec<u8>,
    data_uri: String,
}

impl EncodedIcon {
    /// Wrap PNG bytes, computing the data URI.
    #[must_use]
    pub fn new(png: Vec<u8>) -> Self {
        let mut data_uri = String::with_capacity(DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
        data_uri.push_str(DATA_URI_PREFIX);
        STANDARD.encode_string(&png, &mut data_uri);
        Self { png, data_uri }
    }

    /// Encode a surface.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_surface(surface: &Surface) -> Result<Self> {
        Ok(Self::new(PngEncoder::to_bytes(surface)?))
    }

    /// Raw PNG bytes.
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` URI.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}
