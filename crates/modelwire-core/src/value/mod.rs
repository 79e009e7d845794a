mod tag;

pub use tag::ValueTag;

use crate::graph::ModelId;
use modelwire_schema::ident::ChoiceId;
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

///
/// ChoiceValue
///
/// A resolved member of a named enumeration kind.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceValue {
    pub kind: ChoiceId,
    pub member: String,
}

impl ChoiceValue {
    #[must_use]
    pub fn new(kind: impl Into<ChoiceId>, member: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            member: member.into(),
        }
    }
}

///
/// Value
///
/// Runtime value held by a model field. Nested models are graph handles,
/// never inline ownership; the graph owns every model it created.
///

#[derive(Clone, Debug, PartialEq)]
#[remain::sorted]
pub enum Value {
    Bool(bool),
    Choice(ChoiceValue),
    DateTime(OffsetDateTime),
    Double(f64),
    Int(i32),
    List(Vec<Value>),
    Long(i64),
    Map(Vec<(Value, Value)>),
    Model(ModelId),
    Native(JsonValue),
    Null,
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.tag().label()
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_model(&self) -> Option<ModelId> {
        match self {
            Self::Model(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_choice(&self) -> Option<&ChoiceValue> {
        match self {
            Self::Choice(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date_time(&self) -> Option<OffsetDateTime> {
        match self {
            Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
