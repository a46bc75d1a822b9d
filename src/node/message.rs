use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::parse::{is_truthy, non_negative_int};

/// A message flowing through the queue node.
///
/// Messages are arbitrary JSON objects. A handful of field names are reserved
/// for the control protocol; everything else is opaque payload carried in
/// `extra` and passed through untouched.
///
/// # Fields
///
/// - `reset` - clear the backlog and return the node to idle.
/// - `queueCount` - ask the node to report the current backlog length.
/// - `bypassInterval` - replace the automatic release interval (milliseconds).
/// - `bypass` - truthy enables pass-through mode, falsy restores queueing.
/// - `trigger` - release the next queued message now.
/// - `ttl` - maximum backlog age in milliseconds; `0` or anything invalid
///   means the message never expires.
/// - `_queuetimestamp` - stamped by the node when the message is enqueued.
/// - `_queueCount` - stamped by the node when the message is released, equal
///   to the backlog length right after removal; also carries the answer to a
///   `queueCount` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<Value>,

    #[serde(rename = "queueCount", default, skip_serializing_if = "Option::is_none")]
    pub queue_count_query: Option<Value>,

    #[serde(rename = "bypassInterval", default, skip_serializing_if = "Option::is_none")]
    pub bypass_interval: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Value>,

    #[serde(rename = "_queuetimestamp", default, skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<u64>,

    #[serde(rename = "_queueCount", default, skip_serializing_if = "Option::is_none")]
    pub queue_count: Option<usize>,

    /// Everything that is not part of the control protocol.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The control action a message asks for, if any.
///
/// A message carrying none of the reserved fields is a plain payload and
/// classifies as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Reset,
    CountQuery,
    SetBypassInterval(Value),
    Bypass(bool),
    Trigger,
}

impl Message {
    /// Classifies the message against the reserved control fields.
    ///
    /// The fields are checked in a fixed priority order (`reset`,
    /// `queueCount`, `bypassInterval`, `bypass`, `trigger`) and the first one
    /// present wins, so a message carrying several reserved fields is handled
    /// by exactly one branch.
    pub fn control(&self) -> Option<Control> {
        if self.reset.is_some() {
            Some(Control::Reset)
        } else if self.queue_count_query.is_some() {
            Some(Control::CountQuery)
        } else if let Some(value) = &self.bypass_interval {
            Some(Control::SetBypassInterval(value.clone()))
        } else if let Some(value) = &self.bypass {
            Some(Control::Bypass(is_truthy(value)))
        } else if self.trigger.is_some() {
            Some(Control::Trigger)
        } else {
            None
        }
    }

    /// The message `ttl` coerced to a non-negative integer.
    ///
    /// Accepts numeric and string forms; anything else (negative, fractional,
    /// malformed) collapses to `0`, meaning the message never expires.
    pub fn normalized_ttl(&self) -> u64 {
        self.ttl.as_ref().and_then(non_negative_int).unwrap_or(0)
    }
}
