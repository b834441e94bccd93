//! Browser bindings.
//!
//! The page loads the module, then calls
//! `initVisualization(renderer, payloadJson, optionsToml)` with an object
//! implementing the [`JsRenderer`](backend::JsRenderer) interface. The
//! returned [`WebVisualizer`] owns the render loop and exposes `update`,
//! `restart` and `stop`. Controls and the info panel are found by id and
//! are all optional.

pub mod backend;
mod dom;
pub mod fetch;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use self::backend::JsBackend;
use self::dom::SharedViz;
use crate::engine::render_loop::{ActiveSession, FrameOutcome};
use crate::engine::Visualizer;
use crate::error::VizError;
use crate::options::Options;
use crate::payload::parse_response;
use crate::ui::panel::InfoPanel;

thread_local! {
    static ACTIVE: ActiveSession<JsBackend> = const { ActiveSession::new() };
}

/// Install the panic hook and the console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Create a visualizer in the page's container, compose `payload_json`
/// and start rendering.
///
/// A visualization already running on the page is stopped first. On
/// failure the container shows an error block and the promise-side caller
/// receives the message.
///
/// # Errors
///
/// Missing renderer, invalid options, malformed payload or a render
/// failure.
#[wasm_bindgen(js_name = initVisualization)]
#[allow(clippy::needless_pass_by_value)]
pub fn init_visualization(
    renderer: JsValue,
    payload_json: &str,
    options_toml: Option<String>,
) -> Result<WebVisualizer, JsValue> {
    let (window, document) =
        dom::window_and_document().map_err(|e| to_js(&e))?;
    ACTIVE.with(ActiveSession::stop);
    let options_toml = options_toml.as_deref();
    create(renderer, payload_json, options_toml, &window, &document).map_err(
        |e| {
            dom::show_error(&document, &e);
            to_js(&e)
        },
    )
}

fn create(
    renderer: JsValue,
    payload_json: &str,
    options_toml: Option<&str>,
    window: &Window,
    document: &Document,
) -> Result<WebVisualizer, VizError> {
    let options = options_toml.map_or_else(
        || Ok(Options::default()),
        Options::from_toml,
    )?;
    fetch::configure(&options.network);

    let backend = JsBackend::new(renderer)?;
    let device = dom::device_profile(window, document);
    let (width, height) = dom::viewport_size(window, document);
    let viz = Visualizer::new(options, &device, backend, width, height)?;
    let web = WebVisualizer {
        inner: Rc::new(RefCell::new(viz)),
        window: window.clone(),
        document: document.clone(),
    };
    web.compose(payload_json)?;
    web.wire().map_err(|e| dom_error(&e))?;
    ACTIVE.with(|active| active.install(&web.inner));
    web.run().map_err(|e| dom_error(&e))?;
    Ok(web)
}

/// A running visualization.
#[wasm_bindgen]
pub struct WebVisualizer {
    inner: SharedViz,
    window: Window,
    document: Document,
}

#[wasm_bindgen]
impl WebVisualizer {
    /// Replace the scene with `payload_json` and refresh the info panel.
    ///
    /// # Errors
    ///
    /// Malformed payload or unusable bounds; the error block is shown.
    pub fn update(&self, payload_json: &str) -> Result<(), JsValue> {
        self.compose(payload_json).map_err(|e| {
            dom::show_error(&self.document, &e);
            to_js(&e)
        })
    }

    /// Start a fresh render loop, cancelling the current one and any
    /// other visualization running on the page.
    ///
    /// # Errors
    ///
    /// If the first animation frame cannot be requested.
    pub fn restart(&self) -> Result<(), JsValue> {
        ACTIVE.with(|active| active.install(&self.inner));
        self.run()
    }

    /// Stop rendering.
    pub fn stop(&self) {
        self.inner.borrow_mut().stop();
    }

    /// Last sampled frames per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.inner.borrow().fps()
    }

    /// Whether the session runs in degraded mode.
    #[wasm_bindgen(js_name = isDegraded)]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.inner.borrow().quality().is_degraded()
    }

    /// Report of the last composition as JSON.
    #[wasm_bindgen(js_name = lastReport)]
    #[must_use]
    pub fn last_report(&self) -> Option<String> {
        let viz = self.inner.borrow();
        viz.last_report()
            .and_then(|report| serde_json::to_string(report).ok())
    }
}

impl WebVisualizer {
    fn compose(&self, payload_json: &str) -> Result<(), VizError> {
        let response = parse_response(payload_json)?;
        let _ = self.inner.borrow_mut().compose(&response.visualization)?;
        dom::show_info(&self.document, &InfoPanel::from_response(&response));
        Ok(())
    }

    fn wire(&self) -> Result<(), JsValue> {
        dom::wire_controls(&self.document, &self.inner)?;
        if let Some(surface) = dom::container(&self.document) {
            dom::wire_pointer(&surface, &self.inner)?;
        }
        dom::wire_resize(&self.window, &self.document, &self.inner)
    }

    /// Drive frames from `requestAnimationFrame` until the token goes
    /// stale. The next frame is requested before the current one is drawn;
    /// a stale chain drops its own closure.
    fn run(&self) -> Result<(), JsValue> {
        let token = self.inner.borrow_mut().start();
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        let next = Rc::clone(&slot);
        let viz = Rc::clone(&self.inner);
        let window = self.window.clone();

        *slot.borrow_mut() = Some(Closure::new(move |now: f64| {
            if !viz.borrow().is_current(token) {
                let _ = next.borrow_mut().take();
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                let _ = request_frame(&window, cb);
            }
            let outcome = viz.borrow_mut().frame(token, now);
            if let Ok(FrameOutcome::Rendered { degraded: true }) = outcome {
                log::warn!("switched to degraded rendering");
            }
        }));

        let first = slot
            .borrow()
            .as_ref()
            .map(|cb| request_frame(&self.window, cb));
        first.transpose().map(|_| ())
    }
}

fn request_frame(
    window: &Window,
    callback: &Closure<dyn FnMut(f64)>,
) -> Result<i32, JsValue> {
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

fn to_js(error: &VizError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn dom_error(value: &JsValue) -> VizError {
    VizError::BackendUnavailable(
        value.as_string().unwrap_or_else(|| format!("{value:?}")),
    )
}
