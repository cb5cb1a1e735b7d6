//! Rasterization of the eye shapes.
//!
//! Shapes are sampled on a 4×4 grid per pixel and blended with the resulting
//! coverage, which gives the soft edges a browser canvas produces while
//! staying fully deterministic.
//!
//! # Algorithms
//!
//! - **Stroked ellipse**: a sample is covered when it lies between the inner
//!   and outer ellipses offset by half the line width
//! - **Filled circle**: a sample is covered when it lies within the radius

mod primitives;

pub use primitives::{fill_circle, stroke_ellipse, Circle, Drawable, Ellipse, SUBSAMPLES};
