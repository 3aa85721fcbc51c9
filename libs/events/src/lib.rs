//! # relay-events
//!
//! Immutable event envelope construction for the relay bus.
//!
//! ## Design Principles
//!
//! - An envelope is validated once, at construction, and never changes
//!   afterwards
//! - Missing message keys resolve to an explicit absent marker, never a
//!   failure
//! - Identity and creation time come from resource finalization, not from
//!   callers
//! - An envelope that deserializes is an envelope that would have built
//!
//! ## Construction
//!
//! ```
//! use relay_events::Event;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), relay_events::EventError> {
//! let event = Event::builder("user.created")
//!     .message([("user_id", json!("u1"))])
//!     .correlation_id("c-42")
//!     .build()?;
//!
//! assert_eq!(event.name(), "user.created");
//! assert_eq!(event.message().get("user_id").as_str(), Some("u1"));
//! assert!(event.message().get("email").is_absent());
//! # Ok(())
//! # }
//! ```

mod envelope;
mod error;
mod message;

pub use envelope::{Event, EventBuilder, EventInput, EventMeta};
pub use error::EventError;
pub use message::{Attribute, Message};
