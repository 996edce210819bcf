//! Nebula Agent - Worker wiring
//!
//! Connects a delivery mechanism to the JSON disk sink:
//!
//! ```text
//! [Delivery] --Message--> [NebulaAgent::run] --> [JsonDiskSink::persist]
//! ```
//!
//! The agent never sees transport details - anything that can hand over
//! `Message` values implements `Delivery`. The binary runs against
//! JSON-lines on stdin; tests feed an in-process channel.

pub mod agent;
pub mod delivery;

pub use agent::NebulaAgent;
pub use delivery::{ChannelDelivery, Delivery, StdinDelivery};
