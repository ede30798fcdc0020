//! Crate-wide error type.
//!
//! Everything below the wasm boundary returns [`Result`]; exported functions
//! convert into `JsValue` so the browser sees a readable message.

use wasm_bindgen::JsValue;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("no global window")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    /// A DOM element we expected (or tried to create) is missing.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("canvas 2d context unavailable")]
    Canvas,

    /// Any failure reported by a web API call.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Rejected or unparsable configuration.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(GameError::NoWindow.to_string(), "no global window");
        assert_eq!(
            GameError::MissingElement("vg-canvas").to_string(),
            "missing element: vg-canvas"
        );
        assert_eq!(
            GameError::Config("hits_to_win must be > 0".into()).to_string(),
            "config error: hits_to_win must be > 0"
        );
    }
}
