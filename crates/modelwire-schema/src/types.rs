use crate::ident::{KindName, SchemaId};
use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Primitive
///
/// Builtin kind names a field may declare directly. Structural kinds
/// (`List`, `Map`) carry their element kinds as `KindRef` parameters.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
pub enum Primitive {
    Boolean,
    DateTime,
    Double,
    Integer,
    List,
    Long,
    Map,
    Text,
}

impl Primitive {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Long | Self::Double)
    }

    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::List | Self::Map)
    }

    /// Number of kind parameters a declaration of this primitive must carry.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::List => 1,
            Self::Map => 2,
            _ => 0,
        }
    }
}

///
/// KindRef
///
/// A declared value kind: a kind name plus ordered kind parameters.
/// `List<Text>` is the name `List` with one parameter; a schema-backed
/// model kind uses the schema's URI-like id as its name.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KindRef {
    name: KindName,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<KindRef>,
}

impl KindRef {
    #[must_use]
    pub fn new(name: impl Into<KindName>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: Self) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(primitive.to_string())
    }

    #[must_use]
    pub fn model(schema: impl Into<SchemaId>) -> Self {
        Self::new(schema.into().as_str())
    }

    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::primitive(Primitive::List).with_param(element)
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::primitive(Primitive::Map).with_param(key).with_param(value)
    }

    #[must_use]
    pub const fn name(&self) -> &KindName {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[Self] {
        &self.params
    }

    /// Parse the kind name as a builtin primitive, if it is one.
    #[must_use]
    pub fn as_primitive(&self) -> Option<Primitive> {
        self.name.as_str().parse().ok()
    }

    /// The schema id this kind refers to, when the name is URI-like.
    #[must_use]
    pub fn as_schema_id(&self) -> Option<SchemaId> {
        self.name
            .is_uri_like()
            .then(|| SchemaId::new(self.name.as_str()))
    }
}

impl fmt::Display for KindRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some((first, rest)) = self.params.split_first() {
            write!(f, "<{first}")?;
            for param in rest {
                write!(f, ", {param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

///
/// Literal
///
/// Default-value literal a field declaration may carry.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[remain::sorted]
pub enum Literal {
    Bool(bool),
    Double(f64),
    Long(i64),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}
