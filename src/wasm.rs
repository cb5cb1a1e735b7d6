//! WebAssembly bindings for blink-favicon.
//!
//! Drive the animator from `requestAnimationFrame` and let it write the icon
//! link itself.
//!
//! # Building
//!
//! The default `runtime` feature pulls in tokio and clap, which do not
//! target `wasm32`. Build with it disabled:
//!
//! ```bash
//! wasm-pack build --target web -- --no-default-features --features wasm
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmFavicon } from 'blink-favicon';
//!
//! await init();
//!
//! const favicon = new WasmFavicon();
//! function frame(ts) {
//!     favicon.tick(ts);
//!     favicon.publish('dynamic-favicon');
//!     requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::animator::FaviconAnimator;
use crate::delay::{UniformDelay, DEFAULT_DELAY_MS};

/// Convert an animator error into a JavaScript exception value.
fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browser-side favicon animator.
#[wasm_bindgen]
pub struct WasmFavicon {
    animator: FaviconAnimator,
    start_ms: Option<f64>,
    href: String,
}

#[wasm_bindgen]
impl WasmFavicon {
    /// Create an animator. Pass a seed for reproducible blink timing.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<WasmFavicon, JsValue> {
        let delay = match seed {
            Some(seed) => {
                let rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
                UniformDelay::new(rng, DEFAULT_DELAY_MS).map_err(js_error)?
            }
            None => UniformDelay::from_entropy(),
        };

        let animator = FaviconAnimator::builder()
            .delay(delay)
            .build()
            .map_err(js_error)?;

        Ok(Self {
            animator,
            start_ms: None,
            href: String::new(),
        })
    }

    /// Render the frame for a `requestAnimationFrame` timestamp and return
    /// its data URI.
    ///
    /// The first timestamp seen becomes time zero.
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<String, JsValue> {
        let start = *self.start_ms.get_or_insert(timestamp_ms);
        let elapsed = Duration::try_from_secs_f64((timestamp_ms - start).max(0.0) / 1000.0)
            .unwrap_or(Duration::ZERO);

        let icon = self.animator.frame(elapsed).map_err(js_error)?;
        self.href.clear();
        self.href.push_str(icon.data_uri());
        Ok(self.href.clone())
    }

    /// Set `href` of the element with `element_id` to the latest frame.
    ///
    /// Returns `false` when there is no such element or no frame yet.
    #[wasm_bindgen]
    pub fn publish(&self, element_id: &str) -> bool {
        if self.href.is_empty() {
            return false;
        }
        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
        else {
            return false;
        };
        element.set_attribute("href", &self.href).is_ok()
    }

    /// Current phase: `OPEN`, `CLOSING` or `OPENING`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.animator.state().phase().to_string()
    }

    /// Current eye height.
    #[wasm_bindgen(getter, js_name = eyeHeight)]
    pub fn eye_height(&self) -> f32 {
        self.animator.state().eye_height()
    }

    /// Number of blinks so far.
    #[wasm_bindgen(getter)]
    pub fn blinks(&self) -> f64 {
        self.animator.blinks() as f64
    }
}
