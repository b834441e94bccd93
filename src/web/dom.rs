//! DOM access: device probing, listeners, controls and panels.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget,
    HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, MouseEvent,
    WebGlRenderingContext, WheelEvent, Window,
};

use super::backend::JsBackend;
use crate::engine::command::VizCommand;
use crate::engine::render_loop::SharedVisualizer;
use crate::error::VizError;
use crate::net::listener::ListenerOptions;
use crate::quality::DeviceProfile;
use crate::ui::controls::{
    ControlId, ControlValue, CONTAINER_ID, INFO_PANEL_ID,
};
use crate::ui::panel::{error_html, InfoPanel};

/// Shared handle used by every event closure.
pub(crate) type SharedViz = SharedVisualizer<JsBackend>;

/// Pixels of wheel delta per zoom step.
const WHEEL_STEP_PX: f64 = 100.0;

/// The browser window and its document.
pub(crate) fn window_and_document() -> Result<(Window, Document), VizError> {
    let window = web_sys::window().ok_or_else(|| {
        VizError::BackendUnavailable("no window".to_owned())
    })?;
    let document = window.document().ok_or_else(|| {
        VizError::BackendUnavailable("no document".to_owned())
    })?;
    Ok((window, document))
}

/// Probe the user agent, WebGL support and pixel ratio.
pub(crate) fn device_profile(
    window: &Window,
    document: &Document,
) -> DeviceProfile {
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let context = webgl_context(document);
    let extensions = context
        .as_ref()
        .and_then(WebGlRenderingContext::get_supported_extensions)
        .map(|list| list.iter().filter_map(|e| e.as_string()).collect())
        .unwrap_or_default();
    DeviceProfile {
        user_agent,
        webgl: context.is_some(),
        extensions,
        device_pixel_ratio: window.device_pixel_ratio() as f32,
    }
}

/// A WebGL context on a detached probe canvas.
fn webgl_context(document: &Document) -> Option<WebGlRenderingContext> {
    let canvas = document
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas
        .get_context("webgl")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<WebGlRenderingContext>().ok())
}

/// The visualization container, if the page has one.
pub(crate) fn container(document: &Document) -> Option<Element> {
    document.get_element_by_id(CONTAINER_ID)
}

/// Viewport size: the container's client box, else the window's inner
/// size.
pub(crate) fn viewport_size(
    window: &Window,
    document: &Document,
) -> (u32, u32) {
    if let Some(el) = container(document) {
        let (w, h) = (el.client_width(), el.client_height());
        if w > 0 && h > 0 {
            return (w as u32, h as u32);
        }
    }
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).map_or(1, |v| v.max(1.0) as u32)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Register `handler` for `event` on `target` for the page's lifetime.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let opts = ListenerOptions::for_event(event, ListenerOptions::default());
    let js_opts = AddEventListenerOptions::new();
    if let Some(passive) = opts.passive {
        js_opts.set_passive(passive);
    }
    js_opts.set_capture(opts.capture);
    js_opts.set_once(opts.once);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &js_opts,
    )?;
    closure.forget();
    Ok(())
}

// ── Controls ─────────────────────────────────────────────────────────────

/// Enable every control present on the page and route its events to
/// `viz`. Absent controls are skipped.
pub(crate) fn wire_controls(
    document: &Document,
    viz: &SharedViz,
) -> Result<(), JsValue> {
    for control in ControlId::ALL {
        let Some(el) = document.get_element_by_id(control.dom_id()) else {
            log::debug!("control #{} not present", control.dom_id());
            continue;
        };
        set_enabled(&el);
        let viz = Rc::clone(viz);
        let source = el.clone();
        listen(&el, control.event(), move |_: Event| {
            let command = control_value(&source, control)
                .and_then(|value| control.command(&value));
            if let Some(command) = command {
                viz.borrow_mut().execute(command);
            }
        })?;
    }
    Ok(())
}

fn control_value(el: &Element, control: ControlId) -> Option<ControlValue> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(if control.is_checkbox() {
            ControlValue::Checked(input.checked())
        } else {
            ControlValue::Text(input.value())
        });
    }
    el.dyn_ref::<HtmlSelectElement>()
        .map(|select| ControlValue::Text(select.value()))
}

fn set_enabled(el: &Element) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_disabled(false);
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.set_disabled(false);
    }
}

// ── Pointer and viewport ─────────────────────────────────────────────────

/// Drag-to-orbit and wheel zoom on `surface`.
pub(crate) fn wire_pointer(
    surface: &Element,
    viz: &SharedViz,
) -> Result<(), JsValue> {
    let last: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));

    let down = Rc::clone(&last);
    listen(surface, "mousedown", move |e: Event| {
        down.set(mouse_pos(&e));
    })?;

    let moved = Rc::clone(&last);
    let drag_viz = Rc::clone(viz);
    listen(surface, "mousemove", move |e: Event| {
        let (Some(prev), Some(pos)) = (moved.get(), mouse_pos(&e)) else {
            return;
        };
        moved.set(Some(pos));
        drag_viz
            .borrow_mut()
            .execute(VizCommand::RotateCamera { delta: pos - prev });
    })?;

    for event in ["mouseup", "mouseleave"] {
        let up = Rc::clone(&last);
        listen(surface, event, move |_: Event| up.set(None))?;
    }

    let wheel_viz = Rc::clone(viz);
    listen(surface, "wheel", move |e: Event| {
        let Some(wheel) = e.dyn_ref::<WheelEvent>() else { return };
        wheel.prevent_default();
        let steps = (-wheel.delta_y() / WHEEL_STEP_PX) as f32;
        wheel_viz.borrow_mut().execute(VizCommand::Zoom { steps });
    })
}

fn mouse_pos(e: &Event) -> Option<Vec2> {
    let e = e.dyn_ref::<MouseEvent>()?;
    Some(Vec2::new(e.client_x() as f32, e.client_y() as f32))
}

/// Follow window resizes.
pub(crate) fn wire_resize(
    window: &Window,
    document: &Document,
    viz: &SharedViz,
) -> Result<(), JsValue> {
    let viz = Rc::clone(viz);
    let win = window.clone();
    let doc = document.clone();
    listen(window, "resize", move |_: Event| {
        let (width, height) = viewport_size(&win, &doc);
        viz.borrow_mut().execute(VizCommand::Resize { width, height });
    })
}

// ── Panels ───────────────────────────────────────────────────────────────

/// Fill the info panel, if the page has one.
pub(crate) fn show_info(document: &Document, panel: &InfoPanel) {
    if let Some(el) = document.get_element_by_id(INFO_PANEL_ID) {
        el.set_inner_html(&panel.to_html());
    }
}

/// Log `error` and replace the container content with an error block.
pub(crate) fn show_error(document: &Document, error: &VizError) {
    log::error!("{error}");
    if let Some(el) = container(document) {
        el.set_inner_html(&error_html(&error.to_string()));
    }
}
