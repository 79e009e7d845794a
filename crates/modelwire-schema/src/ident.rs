//! Identifier newtypes shared across the declaration and runtime layers.
//!
//! Each identifier is an owned string with value semantics. `Borrow<str>`
//! lets map lookups run against plain `&str` keys without allocating.

use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

macro_rules! ident_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
            Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

ident_type! {
    ///
    /// SchemaId
    /// URI-like identity of one schema, e.g. `urn:example:resource`.
    ///
    SchemaId
}

ident_type! {
    ///
    /// ChoiceId
    /// Identity of one named enumeration kind.
    ///
    ChoiceId
}

ident_type! {
    ///
    /// FieldName
    ///
    FieldName
}

ident_type! {
    ///
    /// RelationId
    /// Hypermedia link relation key, e.g. `self` or `next`.
    ///
    RelationId
}

ident_type! {
    ///
    /// KindName
    /// Name component of a declared value kind reference.
    ///
    KindName
}

impl KindName {
    /// URI-like names denote schema-backed model kinds.
    #[must_use]
    pub fn is_uri_like(&self) -> bool {
        self.0.contains(':') || self.0.contains('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ident_lookup_by_str_borrow() {
        let mut map: HashMap<SchemaId, u32> = HashMap::new();
        map.insert(SchemaId::new("urn:example:a"), 1);

        assert_eq!(map.get("urn:example:a"), Some(&1));
        assert_eq!(map.get("urn:example:b"), None);
    }

    #[test]
    fn kind_name_uri_detection() {
        assert!(KindName::new("urn:example:author").is_uri_like());
        assert!(KindName::new("example.org/author").is_uri_like());
        assert!(!KindName::new("Text").is_uri_like());
        assert!(!KindName::new("color").is_uri_like());
    }
}
