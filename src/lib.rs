//! # blink-favicon
//!
//! An animated favicon: a cartoon eye that blinks at random intervals while
//! its pupil sweeps left and right, rasterized into a 32×32 bitmap every
//! frame and published as a `data:image/png;base64,...` URI.
//!
//! ## Features
//!
//! - **Deterministic core**: the blink state machine and rasterizer depend
//!   only on their inputs; randomness is confined to an injectable
//!   [`delay::DelaySource`]
//! - **Pure Rust output**: PNG via the `png` crate, no canvas or libpng
//! - **Native loop**: tokio-driven [`frame_loop::FrameLoop`] with a shutdown
//!   token (feature `runtime`, on by default)
//! - **Browser**: `WasmFavicon` bindings (feature `wasm`)
//!
//! ## Quick Start
//!
//! ```rust
//! use blink_favicon::prelude::*;
//! use std::time::Duration;
//!
//! let mut animator = FaviconAnimator::builder()
//!     .delay(UniformDelay::seeded(7))
//!     .build()?;
//! let mut link = IconLink::new(IconLink::DEFAULT_ID);
//!
//! animator.frame_into(Duration::from_millis(16), &mut link)?;
//! assert!(link.href().is_some());
//! # Ok::<(), blink_favicon::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime`: tokio frame loop and the `blink-favicon` binary
//! - `wasm`: WebAssembly bindings

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the favicon palette.
pub mod color;

/// Offscreen pixel surface.
pub mod surface;

/// Rasterization of the eye shapes.
pub mod render;

/// Output encoders (PNG, data URI).
pub mod output;

// ============================================================================
// Animation Modules
// ============================================================================

/// Blink state machine and close schedule.
pub mod blink;

/// Blink delay sources.
pub mod delay;

/// The favicon animator.
pub mod animator;

/// Icon destinations.
pub mod sink;

/// Configuration.
pub mod config;

// ============================================================================
// Optional Modules
// ============================================================================

/// Native frame loop.
#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub mod frame_loop;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for blink-favicon operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use blink_favicon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::{FaviconAnimator, Palette};
    pub use crate::blink::{BlinkState, Phase, Transition};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::delay::{DelaySource, FixedDelay, UniformDelay};
    pub use crate::error::{Error, Result};
    #[cfg(feature = "runtime")]
    pub use crate::frame_loop::{FrameLoop, FrameStats, Shutdown};
    pub use crate::output::{EncodedIcon, PngEncoder};
    pub use crate::sink::{IconLink, IconSink, PngFileSink};
    pub use crate::surface::Surface;
}
