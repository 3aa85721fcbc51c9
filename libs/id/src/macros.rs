//! Macro for declaring typed resource ids.

/// Declares a prefixed, ULID-backed id type.
///
/// The generated type carries:
/// - a `PREFIX` constant and a [`ResourceId`](crate::ResourceId) impl
/// - `new()` for a fresh time-ordered id
/// - strict `parse()` / `FromStr` of the canonical `{prefix}-{ulid}` form
/// - `Display`, `Serialize`, and `Deserialize` through the canonical form
///
/// There is deliberately no `Default`: identity is minted by resource
/// finalization, never implicitly.
///
/// # Example
///
/// ```ignore
/// typed_id!(EventId, "evt", "Identity of one event envelope.");
///
/// let id = EventId::new();
/// let same: EventId = id.to_string().parse()?;
/// ```
#[macro_export]
macro_rules! typed_id {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            /// Canonical prefix for this id kind.
            pub const PREFIX: &'static str = $prefix;

            /// Mints a fresh, time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            /// Wraps a raw ULID.
            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the ULID payload.
            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            /// Parses the canonical `{prefix}-{ulid}` form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                let (prefix, payload) = s.split_once('-').ok_or($crate::IdError::NoSeparator)?;

                if prefix != Self::PREFIX {
                    return Err($crate::IdError::WrongPrefix {
                        expected: Self::PREFIX,
                        found: prefix.to_string(),
                    });
                }

                payload
                    .parse::<$crate::Ulid>()
                    .map(Self)
                    .map_err(|e| $crate::IdError::MalformedUlid(e.to_string()))
            }
        }

        impl $crate::ResourceId for $name {
            const PREFIX: &'static str = $prefix;

            fn generate() -> Self {
                Self::new()
            }

            fn payload(&self) -> $crate::Ulid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}
