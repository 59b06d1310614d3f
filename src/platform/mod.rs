//! Platform abstraction layer
//!
//! Outbound real-currency purchase requests. On the web these go to the
//! host Telegram WebApp; natively they are only logged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fire-and-forget message asking the host to charge the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub stars: u32,
}

impl PurchaseRequest {
    /// One extra max hp for `stars`
    pub fn buy_hp(stars: u32) -> Self {
        Self {
            kind: "buy_hp".to_string(),
            stars,
        }
    }

    pub fn to_json(&self) -> Result<String, ChannelError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("purchase channel unavailable")]
    Unavailable,
    #[error("failed to encode purchase request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("host rejected message: {0}")]
    Send(String),
}

/// Where purchase requests are sent. Sending never waits for a reply.
pub trait PurchaseChannel {
    fn send(&mut self, request: &PurchaseRequest) -> Result<(), ChannelError>;
}

/// Channel that only logs (native builds)
#[derive(Debug, Default)]
pub struct LogChannel;

impl PurchaseChannel for LogChannel {
    fn send(&mut self, request: &PurchaseRequest) -> Result<(), ChannelError> {
        log::info!("Purchase request (not sent): {}", request.to_json()?);
        Ok(())
    }
}

/// Channel that records every request (tests and headless runs)
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub sent: Vec<PurchaseRequest>,
}

impl PurchaseChannel for RecordingChannel {
    fn send(&mut self, request: &PurchaseRequest) -> Result<(), ChannelError> {
        self.sent.push(request.clone());
        Ok(())
    }
}

/// Telegram WebApp `sendData` bridge
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct TelegramChannel;

#[cfg(target_arch = "wasm32")]
impl TelegramChannel {
    fn web_app() -> Option<wasm_bindgen::JsValue> {
        use wasm_bindgen::JsValue;

        let window = web_sys::window()?;
        let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        let app = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        (!app.is_undefined() && !app.is_null()).then_some(app)
    }

    /// Tell the host the app is ready and take the full viewport
    pub fn init() {
        use wasm_bindgen::JsCast;

        let Some(app) = Self::web_app() else {
            log::info!("Telegram WebApp not present");
            return;
        };
        for method in ["ready", "expand"] {
            if let Ok(f) = js_sys::Reflect::get(&app, &method.into()) {
                if let Ok(f) = f.dyn_into::<js_sys::Function>() {
                    if let Err(e) = f.call0(&app) {
                        log::warn!("Telegram WebApp.{} failed: {:?}", method, e);
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl PurchaseChannel for TelegramChannel {
    fn send(&mut self, request: &PurchaseRequest) -> Result<(), ChannelError> {
        use wasm_bindgen::JsCast;

        let app = Self::web_app().ok_or(ChannelError::Unavailable)?;
        let send_data = js_sys::Reflect::get(&app, &"sendData".into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or(ChannelError::Unavailable)?;
        let json = request.to_json()?;
        send_data
            .call1(&app, &json.into())
            .map_err(|e| ChannelError::Send(format!("{:?}", e)))?;
        log::info!("Purchase request sent: {:?}", request);
        Ok(())
    }
}
