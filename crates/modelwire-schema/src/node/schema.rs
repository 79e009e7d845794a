use crate::{
    ident::SchemaId,
    node::{Field, FieldList, Link, LinkList},
};
use serde::Serialize;

///
/// Schema
///
/// Immutable declaration of one resource type: directly declared fields
/// and links plus the ordered list of direct base schema ids. Inherited
/// declarations are resolved separately, never stored here.
///

#[derive(Clone, Debug, Serialize)]
pub struct Schema {
    pub id: SchemaId,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<SchemaId>,

    pub fields: FieldList,
    pub links: LinkList,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Schema {
    #[must_use]
    pub fn new(id: impl Into<SchemaId>) -> Self {
        Self {
            id: id.into(),
            bases: Vec::new(),
            fields: FieldList::default(),
            links: LinkList::default(),
            title: None,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<SchemaId>) -> Self {
        self.bases.push(base.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
