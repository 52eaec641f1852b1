//! Newtype IDs for type-safe document references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing identifiers from different collections.

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a newtype wrapper around the store-assigned document id with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use herreria_core::define_id;
/// define_id!(DoorId);
/// define_id!(GateId);
///
/// let door = DoorId::new("abc123");
/// let gate = GateId::new("abc123");
///
/// // These are different types, so this won't compile:
/// // let _: DoorId = gate;
/// assert_eq!(door.as_str(), gate.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a store-assigned document id.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying document id.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying document id.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Collection document IDs
define_id!(ProductId);
define_id!(FeaturedProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_matches_inner() {
        let id = ProductId::new("kX9s2");
        assert_eq!(id.to_string(), "kX9s2");
        assert_eq!(id.as_str(), "kX9s2");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = FeaturedProductId::from("f-1");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"f-1\"");
    }
}
