//! Message type
//!
//! One delivered unit of work: a selector naming what the payload is, and
//! the payload itself. The payload is optional - control messages arrive
//! with no data and the sink skips them.

use crate::{Payload, Selector};

/// A message delivered to the worker
///
/// Immutable once constructed. The sink owns the message for the duration
/// of one `persist` call; only its serialized projection is ever stored.
///
/// # Example
///
/// ```
/// use nebula_message::{Message, Payload, Value};
///
/// let mut payload = Payload::new();
/// payload.insert("url".into(), Value::from("https://ostorlab.co"));
/// payload.insert("method".into(), Value::from("GET"));
///
/// let message = Message::new("v3.asset.link", payload);
/// assert_eq!(message.selector().as_str(), "v3.asset.link");
/// assert!(message.data().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Semantic type tag, drives output routing
    selector: Selector,

    /// Key-value payload; `None` for payload-less control messages
    data: Option<Payload>,
}

impl Message {
    /// Create a message carrying a payload
    pub fn new(selector: impl Into<Selector>, data: Payload) -> Self {
        Self {
            selector: selector.into(),
            data: Some(data),
        }
    }

    /// Create a message with no payload
    pub fn without_data(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            data: None,
        }
    }

    /// The message's selector
    #[inline]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The message's payload, if any
    #[inline]
    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// Consume the message, returning its parts
    pub fn into_parts(self) -> (Selector, Option<Payload>) {
        (self.selector, self.data)
    }
}
