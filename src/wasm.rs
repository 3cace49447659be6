use std::cell::RefCell;
use std::rc::{Rc, Weak};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::animator::ScrollAnimator;
use crate::config::{ProgressCurve, TimelineConfig};
use crate::host::{FrameHandle, ScrollHost};
use crate::progress::scroll_progress;
use crate::scene::SceneFrame;
use crate::speed::ScrollSpeed;
use crate::theme::{self, LocalStorageThemeStore, Theme};
use crate::timeline::{EraSection, TimelineDocument};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn parse_config(config_json: Option<String>) -> Result<TimelineConfig, JsValue> {
    match config_json {
        Some(json) => TimelineConfig::from_json(&json)
            .map_err(|e| JsValue::from_str(&format!("{:#}", e))),
        None => Ok(TimelineConfig::default()),
    }
}

/// The browser window as a scroll host.
struct BrowserHost {
    window: web_sys::Window,
    /// Frame callback handed to `requestAnimationFrame`; set once after construction.
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl ScrollHost for BrowserHost {
    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn max_scroll_offset(&self) -> f64 {
        let content = self
            .window
            .document()
            .and_then(|d| d.document_element())
            .map(|root| root.scroll_height() as f64)
            .unwrap_or(0.0);
        let viewport = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        content - viewport
    }

    fn scroll_by(&mut self, pixels: f64) {
        self.window.scroll_by_with_x_and_y(0.0, pixels);
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.as_ref()?;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

struct AutoScrollContext {
    animator: ScrollAnimator,
    host: BrowserHost,
}

/// Auto-scroll control surface for the page (play/pause button + speed slider).
#[wasm_bindgen]
pub struct WasmAutoScroll {
    inner: Rc<RefCell<AutoScrollContext>>,
}

#[wasm_bindgen]
impl WasmAutoScroll {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmAutoScroll, JsValue> {
        init_panic_hook();
        let config = parse_config(config_json)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

        let inner = Rc::new(RefCell::new(AutoScrollContext {
            animator: ScrollAnimator::new(config.auto_scroll),
            host: BrowserHost { window, callback: None },
        }));

        // The callback only holds a weak reference so dropping the controller frees it.
        let weak: Weak<RefCell<AutoScrollContext>> = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                let ctx = &mut *inner;
                ctx.animator.on_frame(&mut ctx.host, timestamp);
            }
        });
        inner.borrow_mut().host.callback = Some(callback);

        Ok(WasmAutoScroll { inner })
    }

    pub fn play(&self) {
        let mut inner = self.inner.borrow_mut();
        let ctx = &mut *inner;
        ctx.animator.start(&mut ctx.host);
    }

    pub fn pause(&self) {
        let mut inner = self.inner.borrow_mut();
        let ctx = &mut *inner;
        ctx.animator.stop(&mut ctx.host);
    }

    pub fn toggle(&self) {
        let mut inner = self.inner.borrow_mut();
        let ctx = &mut *inner;
        ctx.animator.toggle(&mut ctx.host);
    }

    pub fn is_playing(&self) -> bool {
        self.inner.borrow().animator.is_playing()
    }

    /// Set the speed from the slider. Returns the value actually applied.
    pub fn set_speed(&self, value: f64) -> f64 {
        let mut inner = self.inner.borrow_mut();
        let snapped = ScrollSpeed::from_slider(value, inner.animator.config()).get();
        inner.animator.set_speed(snapped).get()
    }

    pub fn speed(&self) -> f64 {
        self.inner.borrow().animator.speed().get()
    }

    pub fn speed_label(&self) -> String {
        self.inner.borrow().animator.speed_label().to_string()
    }

    pub fn min_speed(&self) -> f64 {
        self.inner.borrow().animator.config().min_speed
    }

    pub fn max_speed(&self) -> f64 {
        self.inner.borrow().animator.config().max_speed
    }

    pub fn speed_step(&self) -> f64 {
        self.inner.borrow().animator.config().speed_step
    }
}

impl Drop for WasmAutoScroll {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            let ctx = &mut *inner;
            ctx.animator.stop(&mut ctx.host);
        }
    }
}

/// Decorative chain layer for the page background.
#[wasm_bindgen]
pub struct WasmTimelineScene {
    curve: ProgressCurve,
}

#[wasm_bindgen]
impl WasmTimelineScene {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WasmTimelineScene, JsValue> {
        init_panic_hook();
        let config = parse_config(config_json)?;
        Ok(WasmTimelineScene { curve: config.curve })
    }

    /// Scene for a progress value, as JSON.
    pub fn frame_json(&self, progress: f64) -> String {
        SceneFrame::compose(progress, &self.curve).to_json()
    }

    /// Scene for the window's current scroll position, as JSON.
    pub fn current_frame_json(&self) -> String {
        self.frame_json(current_scroll_progress())
    }
}

/// Progress through the page for the window's current scroll position.
#[wasm_bindgen]
pub fn current_scroll_progress() -> f64 {
    let Some(window) = web_sys::window() else {
        return 0.0;
    };
    let host = BrowserHost { window, callback: None };
    scroll_progress(host.scroll_offset(), host.max_scroll_offset())
}

#[derive(Serialize)]
struct WasmTimelineResult<'a> {
    success: bool,
    error: Option<String>,
    sections: Vec<EraSection<'a>>,
}

/// Group a timeline document by era and lay out its entries.
/// Returns `{ success, error, sections }` as JSON.
#[wasm_bindgen]
pub fn timeline_sections_json(document_json: &str) -> String {
    match TimelineDocument::from_json(document_json) {
        Ok(doc) => {
            let result = WasmTimelineResult {
                success: true,
                error: None,
                sections: doc.sections(),
            };
            serde_json::to_string(&result).unwrap_or_else(|e| {
                format!(
                    r#"{{"success":false,"error":"Serialization error: {}","sections":[]}}"#,
                    e
                )
            })
        }
        Err(e) => {
            log::error!("Failed to load timeline: {:#}", e);
            let result = WasmTimelineResult {
                success: false,
                error: Some(format!("{:#}", e)),
                sections: vec![],
            };
            serde_json::to_string(&result).unwrap_or_else(|_| {
                r#"{"success":false,"error":"Unknown error","sections":[]}"#.to_string()
            })
        }
    }
}

/// Read the stored theme, apply it to the document and return its name.
#[wasm_bindgen]
pub fn load_theme() -> String {
    let theme = theme::load_theme(&LocalStorageThemeStore::new());
    theme::apply_theme(theme);
    theme.to_string()
}

/// Apply and persist a theme. Anything but `light` selects dark.
#[wasm_bindgen]
pub fn set_theme(name: &str) -> String {
    let theme = Theme::from_stored(Some(name));
    theme::apply_theme(theme);
    if let Err(e) = theme::save_theme(&mut LocalStorageThemeStore::new(), theme) {
        log::warn!("Failed to persist theme: {:#}", e);
    }
    theme.to_string()
}
