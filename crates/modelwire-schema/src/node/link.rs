use crate::ident::RelationId;
use serde::Serialize;

///
/// LinkList
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct LinkList {
    links: Vec<Link>,
}

impl LinkList {
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub(crate) fn push(&mut self, link: Link) {
        self.links.push(link);
    }
}

///
/// Link
///
/// Hypermedia link declaration: relation key, default href, and the
/// media types the target accepts and returns.
///

#[derive(Clone, Debug, Serialize)]
pub struct Link {
    pub rel: RelationId,
    pub href: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    #[must_use]
    pub fn new(rel: impl Into<RelationId>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            accepts: Vec::new(),
            returns: Vec::new(),
            title: None,
        }
    }

    #[must_use]
    pub fn accepting(mut self, media_type: impl Into<String>) -> Self {
        self.accepts.push(media_type.into());
        self
    }

    #[must_use]
    pub fn returning(mut self, media_type: impl Into<String>) -> Self {
        self.returns.push(media_type.into());
        self
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
