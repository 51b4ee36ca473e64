//! Identity types for warehouse objects.
//!
//! Identities come straight from the input facts (`robot 3`, `shelf s12`, ...)
//! and are kept as strings. Ordering is lexicographic; every map in the model is
//! keyed by these types, so iteration order (and every tie-break that depends on
//! it) is by identity.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identity from its textual form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identity as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identity of a robot.
    RobotId
);

string_id!(
    /// Identity of a shelf.
    ShelfId
);

string_id!(
    /// Identity of a product.
    ProductId
);

string_id!(
    /// Identity of a customer order.
    OrderId
);

string_id!(
    /// Identity of a picking station.
    StationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![ShelfId::from("s2"), ShelfId::from("s10"), ShelfId::from("s1")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(ShelfId::as_str).collect();
        assert_eq!(names, vec!["s1", "s10", "s2"]);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = RobotId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
        assert_eq!(id.to_string(), "7");
    }
}
