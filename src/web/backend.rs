//! Render backend that hands serialized frames to a JavaScript renderer.
//!
//! The page supplies an object with `configure(settingsJson)`,
//! `render(frameJson)`, `setPixelRatio(ratio)` and `setSize(width,
//! height)`. Each frame crosses the boundary as one JSON string.

use wasm_bindgen::prelude::*;

use crate::error::VizError;
use crate::renderer::{FrameView, RenderBackend, RendererSettings};

#[wasm_bindgen]
extern "C" {
    /// Page-provided object that draws serialized frames.
    pub type JsRenderer;

    #[wasm_bindgen(method, catch)]
    fn configure(this: &JsRenderer, settings: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn render(this: &JsRenderer, frame: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setPixelRatio)]
    fn set_pixel_ratio(this: &JsRenderer, ratio: f32);

    #[wasm_bindgen(method, js_name = setSize)]
    fn set_size(this: &JsRenderer, width: u32, height: u32);
}

/// [`RenderBackend`] over a [`JsRenderer`].
pub struct JsBackend {
    renderer: JsRenderer,
}

impl JsBackend {
    /// Wrap `renderer`, rejecting `undefined` and `null`.
    ///
    /// # Errors
    ///
    /// [`VizError::BackendUnavailable`] if the page passed no renderer.
    pub fn new(renderer: JsValue) -> Result<Self, VizError> {
        if renderer.is_undefined() || renderer.is_null() {
            return Err(VizError::BackendUnavailable(
                "no renderer object was supplied".to_owned(),
            ));
        }
        Ok(Self {
            renderer: renderer.unchecked_into(),
        })
    }
}

impl RenderBackend for JsBackend {
    fn configure(
        &mut self,
        settings: &RendererSettings,
    ) -> Result<(), VizError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| VizError::Render(e.to_string()))?;
        self.renderer.configure(&json).map_err(|e| js_error(&e))
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.renderer.set_pixel_ratio(ratio);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.renderer.set_size(width, height);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), VizError> {
        let json = frame.to_json()?;
        self.renderer.render(&json).map_err(|e| js_error(&e))
    }
}

/// A thrown JavaScript value as a render error.
pub(crate) fn js_error(value: &JsValue) -> VizError {
    VizError::Render(
        value.as_string().unwrap_or_else(|| format!("{value:?}")),
    )
}
