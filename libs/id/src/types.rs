//! Id types for the relay resource model.

use crate::typed_id;
use ulid::Ulid;

/// Interface shared by the generated id types.
///
/// Resource finalization mints identity through this trait without knowing
/// the concrete kind it is stamping.
pub trait ResourceId:
    Copy
    + Eq
    + Ord
    + std::hash::Hash
    + std::fmt::Display
    + serde::Serialize
    + serde::de::DeserializeOwned
{
    /// Canonical prefix for this id kind.
    const PREFIX: &'static str;

    /// Mints a fresh, time-ordered id.
    fn generate() -> Self;

    /// Returns the ULID payload.
    fn payload(&self) -> Ulid;
}

typed_id!(
    EventId,
    "evt",
    "Identity of one event envelope, minted at finalization."
);

typed_id!(
    ActionId,
    "act",
    "Identity of the operation that triggered an event."
);

// =============================================================================
// Process Identity
// =============================================================================

/// Ambient host process identity.
///
/// Carried in event metadata as a default-value source only; nothing in the
/// system interprets it beyond display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Reads the identity of the running process.
    #[must_use]
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// Wraps a raw process id.
    #[must_use]
    pub const fn new(pid: u32) -> Self {
        Self(pid)
    }

    /// Returns the raw process id.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProcessId {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

impl From<ProcessId> for u32 {
    fn from(pid: ProcessId) -> Self {
        pid.0
    }
}

impl serde::Serialize for ProcessId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ProcessId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pid = u32::deserialize(deserializer)?;
        Ok(Self(pid))
    }
}

// =============================================================================
// Tests
// =============================================================================
