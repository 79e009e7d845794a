use crate::{
    ident::FieldName,
    types::{KindRef, Literal},
};
use serde::Serialize;
use std::ops::Not;

///
/// FieldList
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

///
/// Field
///

#[derive(Clone, Debug, Serialize)]
pub struct Field {
    pub name: FieldName,
    pub kind: KindRef,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    pub hidden: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<FieldName>, kind: KindRef) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            read_only: false,
            hidden: false,
            default: None,
            title: None,
            description: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
