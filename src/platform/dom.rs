//! DOM helpers for the start screen, HUD and game-over overlay

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement};

use super::PlatformError;
use super::error::describe;

/// Element ids the page must provide
pub mod ids {
    pub const CANVAS: &str = "game";
    pub const START_SCREEN: &str = "startScreen";
    pub const START_BUTTON: &str = "startBtn";
    pub const HUD: &str = "hud";
    pub const GAME_OVER: &str = "gameOverModal";
    pub const GAME_OVER_SCORE: &str = "goScore";
    pub const RESTART_BUTTON: &str = "goRestart";
    pub const MENU_BUTTON: &str = "goMenu";
    pub const MUSIC: &str = "bgAudio";
}

pub fn document() -> Result<Document, PlatformError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(PlatformError::MissingElement("document"))
}

pub fn element(id: &'static str) -> Result<Element, PlatformError> {
    document()?
        .get_element_by_id(id)
        .ok_or(PlatformError::MissingElement(id))
}

pub fn html_element(id: &'static str) -> Result<HtmlElement, PlatformError> {
    element(id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PlatformError::MissingElement(id))
}

/// Toggle an overlay. Hidden overlays are also hidden from assistive tech.
pub fn set_visible(id: &'static str, visible: bool) -> Result<(), PlatformError> {
    let el = html_element(id)?;
    el.style()
        .set_property("display", if visible { "flex" } else { "none" })?;
    el.set_attribute("aria-hidden", if visible { "false" } else { "true" })?;
    Ok(())
}

/// Same as [`set_visible`] but only logs a missing element
pub fn show(id: &'static str, visible: bool) {
    if let Err(e) = set_visible(id, visible) {
        log::warn!("Cannot toggle #{}: {}", id, e);
    }
}

pub fn set_text(id: &'static str, text: &str) {
    match element(id) {
        Ok(el) => el.set_text_content(Some(text)),
        Err(e) => log::debug!("Cannot set text: {}", e),
    }
}

/// Request fullscreen on `target`, falling back to the document element.
///
/// `Element.requestFullscreen` returns a promise in current browsers; it is
/// looked up dynamically so older engines without it report a denial instead
/// of throwing.
pub async fn request_fullscreen(target: &Element) -> Result<(), PlatformError> {
    let mut candidates = vec![target.clone()];
    if let Some(root) = document()?.document_element() {
        candidates.push(root);
    }

    for el in candidates {
        let method = Reflect::get(&el, &JsValue::from_str("requestFullscreen"))?;
        let Some(method) = method.dyn_ref::<Function>() else {
            continue;
        };
        let result = method
            .call0(&el)
            .map_err(|e| PlatformError::FullscreenDenied(describe(&e)))?;
        if let Some(promise) = result.dyn_ref::<Promise>() {
            JsFuture::from(promise.clone())
                .await
                .map_err(|e| PlatformError::FullscreenDenied(describe(&e)))?;
        }
        return Ok(());
    }
    Err(PlatformError::FullscreenDenied("unsupported".into()))
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
