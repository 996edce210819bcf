//! Nebula Message - Core message model for the Nebula worker
//!
//! This crate provides the types that flow from the delivery mechanism into
//! the persistence sink:
//! - `Selector` - Dotted type tag identifying a message's semantic kind
//! - `Value` / `Payload` - Free-form key-value payload, values may carry raw bytes
//! - `Message` - One delivered unit: a selector plus an optional payload
//!
//! # Design Principles
//!
//! - **Immutable after construction**: a `Message` is never mutated once built
//! - **Owned data**: the sink owns the message for the duration of one
//!   `persist` call; nothing here borrows from the transport
//! - **Deterministic payloads**: `Payload` is a `BTreeMap`, so iteration
//!   (and therefore serialization) order is stable

mod message;
mod selector;
mod value;

pub use message::Message;
pub use selector::Selector;
pub use value::{Payload, Value};
