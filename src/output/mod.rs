//! Output encoders (PNG bytes, base64 data URIs).

mod png_encoder;

pub use png_encoder::{EncodedIcon, PngEncoder, DATA_URI_PREFIX};
