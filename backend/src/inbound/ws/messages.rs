//! Wire-level frames exchanged on `/ws/gadgets/`.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Gadget, GadgetAction, GadgetEvent, GadgetId};

/// Whether an inbound text frame is an application-level ping.
///
/// Only the `type` field is inspected; anything that is not JSON, or not a
/// ping, is ignored by the session.
pub fn is_ping(text: &str) -> bool {
    serde_json::from_str::<Value>(text)
        .is_ok_and(|value| value.get("type").and_then(Value::as_str) == Some("ping"))
}

/// Reply to an application-level ping.
#[derive(Debug, Serialize)]
pub struct PongFrame {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl Default for PongFrame {
    fn default() -> Self {
        Self { kind: "pong" }
    }
}

/// Server-pushed mutation frame.
///
/// `gadget_id` is always present (`null` for bulk deletes); `gadget` and
/// `ids` only when the event carries them.
#[derive(Debug, Serialize)]
pub struct GadgetEventFrame<'a> {
    pub action: GadgetAction,
    pub gadget_id: Option<GadgetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gadget: Option<&'a Gadget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<&'a [GadgetId]>,
}

impl<'a> From<&'a GadgetEvent> for GadgetEventFrame<'a> {
    fn from(event: &'a GadgetEvent) -> Self {
        Self {
            action: event.action(),
            gadget_id: event.gadget_id(),
            gadget: event.gadget(),
            ids: event.ids(),
        }
    }
}
