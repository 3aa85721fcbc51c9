//! # relay-id
//!
//! Typed identifier primitives for relay resources.
//!
//! ## Design Principles
//!
//! - Identity is minted exactly once, at resource finalization; callers
//!   never invent ids
//! - Every id has a canonical string form with strict parsing
//! - Ids round-trip through serde (format → parse → format)
//! - Distinct resource kinds get distinct id types; they cannot be mixed
//!
//! ## Canonical Form
//!
//! Resource ids render as `{prefix}-{ulid}`:
//!
//! - `evt-01JGD0QYW0Z8F6T1S3N9KXB2CM`
//! - `act-01JGD0R1H7PVEX54AYQ8ZWDM3T`
//!
//! The ULID payload keeps ids time-ordered and unique; the prefix makes the
//! resource kind visible in logs and derived item keys.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
