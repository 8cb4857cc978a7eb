use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum LandingError {
    #[error("no global `window` available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("failed to attach `{event}` listener: {message}")]
    Listener { event: &'static str, message: String },
}

impl LandingError {
    pub fn listener(event: &'static str, err: JsValue) -> Self {
        LandingError::Listener {
            event,
            message: format!("{:?}", err),
        }
    }
}
