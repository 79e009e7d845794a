//! Abstract value-shape classification driving decode dispatch.
//!
//! Classification is total: every declared kind maps to exactly one
//! abstract type, with `Native` as the default sink.

use crate::codec::CodecRegistry;
use derive_more::Display;
use modelwire_schema::{
    store::SchemaStore,
    types::{KindRef, Primitive},
};

/// Placeholder kind name for schema-backed model kinds.
const MODEL_PLACEHOLDER: &str = "modelwire:model";

/// Placeholder kind name for choice kinds.
const CHOICE_PLACEHOLDER: &str = "Choice";

/// Placeholder kind name for opaque passthrough kinds.
const NATIVE_PLACEHOLDER: &str = "Native";

///
/// AbstractType
///
/// Closed set of value-shape categories. Decode dispatch switches on this,
/// never on raw kind names.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum AbstractType {
    Boolean,
    Choice,
    DateTime,
    Double,
    Integer,
    List,
    Long,
    Map,
    Model,
    Native,
    Text,
}

impl AbstractType {
    /// Canonical declared kind for this abstract type.
    ///
    /// Best-effort inverse of [`classify`]: primitive-backed types round-trip
    /// exactly; `Model` maps to a generic model placeholder; `Choice` and
    /// `Native` placeholders classify back as `Native` unless a matching
    /// choice kind is registered.
    #[must_use]
    pub fn placeholder(self) -> KindRef {
        match self {
            Self::Boolean => KindRef::primitive(Primitive::Boolean),
            Self::Choice => KindRef::new(CHOICE_PLACEHOLDER),
            Self::DateTime => KindRef::primitive(Primitive::DateTime),
            Self::Double => KindRef::primitive(Primitive::Double),
            Self::Integer => KindRef::primitive(Primitive::Integer),
            Self::List => KindRef::primitive(Primitive::List),
            Self::Long => KindRef::primitive(Primitive::Long),
            Self::Map => KindRef::primitive(Primitive::Map),
            Self::Model => KindRef::new(MODEL_PLACEHOLDER),
            Self::Native => KindRef::new(NATIVE_PLACEHOLDER),
            Self::Text => KindRef::primitive(Primitive::Text),
        }
    }

    /// Whether values of this type are read through the raw-text path.
    #[must_use]
    pub const fn reads_as_text(self) -> bool {
        matches!(self, Self::Text | Self::Choice | Self::DateTime)
    }
}

/// Classify a declared kind. First match wins:
/// builtin text, schema-backed model, list, map, boolean, choice known to
/// the store, integer, long, double, temporal, registered text codec, and
/// finally opaque `Native`.
#[must_use]
pub fn classify(kind: &KindRef, store: &dyn SchemaStore, codecs: &CodecRegistry) -> AbstractType {
    if let Some(primitive) = kind.as_primitive() {
        return match primitive {
            Primitive::Text => AbstractType::Text,
            Primitive::List => AbstractType::List,
            Primitive::Map => AbstractType::Map,
            Primitive::Boolean => AbstractType::Boolean,
            Primitive::Integer => AbstractType::Integer,
            Primitive::Long => AbstractType::Long,
            Primitive::Double => AbstractType::Double,
            Primitive::DateTime => AbstractType::DateTime,
        };
    }

    let name = kind.name();
    if name.is_uri_like() {
        AbstractType::Model
    } else if store.choice(name.as_str()).is_some() {
        AbstractType::Choice
    } else if codecs.contains(name.as_str()) {
        // kinds with a registered text codec travel as text on the wire
        AbstractType::Text
    } else {
        AbstractType::Native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, TextCodec};
    use crate::value::Value;
    use modelwire_schema::{node::Choice, store::MemoryStore};
    use std::sync::Arc;

    #[derive(Debug)]
    struct UpperCodec;

    impl TextCodec for UpperCodec {
        fn kind(&self) -> &str {
            "upper"
        }

        fn decode(&self, raw: &str) -> Result<Value, CodecError> {
            Ok(Value::Text(raw.to_uppercase()))
        }
    }

    fn store_with_color() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert_choice(Choice::new("color", ["red", "green"]))
            .unwrap();
        store
    }

    #[test]
    fn builtin_names_classify_first() {
        let store = MemoryStore::new();
        let codecs = CodecRegistry::standard();

        for (primitive, expected) in [
            (Primitive::Text, AbstractType::Text),
            (Primitive::Boolean, AbstractType::Boolean),
            (Primitive::Integer, AbstractType::Integer),
            (Primitive::Long, AbstractType::Long),
            (Primitive::Double, AbstractType::Double),
            (Primitive::DateTime, AbstractType::DateTime),
            (Primitive::List, AbstractType::List),
            (Primitive::Map, AbstractType::Map),
        ] {
            assert_eq!(
                classify(&KindRef::primitive(primitive), &store, &codecs),
                expected
            );
        }
    }

    #[test]
    fn uri_like_names_are_model_kinds() {
        let store = MemoryStore::new();
        let codecs = CodecRegistry::standard();

        let kind = KindRef::model("urn:example:author");
        assert_eq!(classify(&kind, &store, &codecs), AbstractType::Model);
    }

    #[test]
    fn known_choice_names_classify_as_choice() {
        let store = store_with_color();
        let codecs = CodecRegistry::standard();

        assert_eq!(
            classify(&KindRef::new("color"), &store, &codecs),
            AbstractType::Choice
        );
    }

    #[test]
    fn codec_backed_names_classify_as_text() {
        let store = MemoryStore::new();
        let mut codecs = CodecRegistry::standard();
        codecs.register(Arc::new(UpperCodec));

        assert_eq!(
            classify(&KindRef::new("upper"), &store, &codecs),
            AbstractType::Text
        );
    }

    #[test]
    fn unknown_names_sink_to_native() {
        let store = MemoryStore::new();
        let codecs = CodecRegistry::standard();

        assert_eq!(
            classify(&KindRef::new("mystery"), &store, &codecs),
            AbstractType::Native
        );
    }

    #[test]
    fn placeholder_round_trips_where_defined() {
        let store = store_with_color();
        let codecs = CodecRegistry::standard();

        for ty in [
            AbstractType::Boolean,
            AbstractType::DateTime,
            AbstractType::Double,
            AbstractType::Integer,
            AbstractType::List,
            AbstractType::Long,
            AbstractType::Map,
            AbstractType::Model,
            AbstractType::Native,
            AbstractType::Text,
        ] {
            assert_eq!(classify(&ty.placeholder(), &store, &codecs), ty);
        }
    }
}
