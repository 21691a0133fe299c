//! UI actions delivered by the page's delegated event listener.
//!
//! Wire format: `{"action":"select_rover","payload":{"rover":"Curiosity"}}`.
//! The rover is referenced by name only; the dashboard resolves it against
//! its own snapshot.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::view::{DISMISS_ERROR, RELOAD, SELECT_ROVER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectRover { rover: String },
    Reload,
    DismissError,
}

#[derive(Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    payload: Value,
}

impl Action {
    /// Build an action from its name and JSON payload.
    pub fn from_parts(name: &str, payload: &Value) -> CoreResult<Action> {
        match name {
            SELECT_ROVER => {
                let rover = payload
                    .get("rover")
                    .and_then(Value::as_str)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| CoreError::BadPayload("select_rover needs a \"rover\" name".into()))?;
                Ok(Action::SelectRover { rover: rover.to_string() })
            }
            RELOAD => Ok(Action::Reload),
            DISMISS_ERROR => Ok(Action::DismissError),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectRover { .. } => SELECT_ROVER,
            Action::Reload => RELOAD,
            Action::DismissError => DISMISS_ERROR,
        }
    }
}

/// Parse a full `{"action":..,"payload":..}` envelope.
pub fn parse_action(input: &[u8]) -> CoreResult<Action> {
    let envelope: Envelope =
        serde_json::from_slice(input).map_err(|e| CoreError::BadPayload(e.to_string()))?;
    Action::from_parts(&envelope.action, &envelope.payload)
}
