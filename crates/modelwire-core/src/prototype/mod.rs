//! Prototype resolution.
//!
//! A prototype is the inheritance-flattened view of one schema: the
//! winning field and link definitions after merging the whole ancestor
//! graph, plus the ordered ancestor list itself. Resolution is pure and
//! idempotent; the owning context memoizes results per schema id.

#[cfg(test)]
mod tests;

use crate::obs::{DecodeEvent, DecodeSink};
use modelwire_schema::{
    ident::{FieldName, RelationId, SchemaId},
    node::{Field, Link, Schema},
    store::SchemaStore,
    types::{KindRef, Literal},
};
use std::collections::{HashSet, VecDeque};
use thiserror::Error as ThisError;

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("unknown schema '{0}'")]
    UnknownSchema(SchemaId),

    #[error("schema '{subject}' references missing base '{missing}'")]
    MissingBase { subject: SchemaId, missing: SchemaId },
}

///
/// MissingBasePolicy
///
/// What resolution does when a referenced base schema cannot be found.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MissingBasePolicy {
    /// Resolution fails on the first unresolvable base.
    #[default]
    Fail,

    /// The unresolved branch is skipped and a [`DecodeEvent::ResolutionWarning`]
    /// is emitted through the sink.
    Warn,
}

///
/// FieldPrototype
///
/// Winning definition of one field after the inheritance merge. `owner`
/// is the most-derived schema that declared it.
///

#[derive(Clone, Debug)]
pub struct FieldPrototype {
    pub name: FieldName,
    pub kind: KindRef,
    pub required: bool,
    pub read_only: bool,
    pub hidden: bool,
    pub default: Option<Literal>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub owner: SchemaId,
}

impl FieldPrototype {
    fn new(field: &Field, owner: &SchemaId) -> Self {
        Self {
            name: field.name.clone(),
            kind: field.kind.clone(),
            required: field.required,
            read_only: field.read_only,
            hidden: field.hidden,
            default: field.default.clone(),
            title: field.title.clone(),
            description: field.description.clone(),
            owner: owner.clone(),
        }
    }

    /// Overwrite the accumulator with a more-derived declaration. Every
    /// declared attribute is copied; the last extension wins.
    fn extend(&mut self, field: &Field, owner: &SchemaId) {
        self.kind = field.kind.clone();
        self.required = field.required;
        self.read_only = field.read_only;
        self.hidden = field.hidden;
        self.default = field.default.clone();
        self.title = field.title.clone();
        self.description = field.description.clone();
        self.owner = owner.clone();
    }
}

///
/// LinkPrototype
///

#[derive(Clone, Debug)]
pub struct LinkPrototype {
    pub rel: RelationId,
    pub href: String,
    pub accepts: Vec<String>,
    pub returns: Vec<String>,
    pub title: Option<String>,
    pub owner: SchemaId,
}

impl LinkPrototype {
    fn new(link: &Link, owner: &SchemaId) -> Self {
        Self {
            rel: link.rel.clone(),
            href: link.href.clone(),
            accepts: link.accepts.clone(),
            returns: link.returns.clone(),
            title: link.title.clone(),
            owner: owner.clone(),
        }
    }

    fn extend(&mut self, link: &Link, owner: &SchemaId) {
        self.href = link.href.clone();
        self.accepts = link.accepts.clone();
        self.returns = link.returns.clone();
        self.title = link.title.clone();
        self.owner = owner.clone();
    }
}

///
/// Prototype
///

#[derive(Clone, Debug)]
pub struct Prototype {
    id: SchemaId,
    ancestors: Vec<SchemaId>,
    fields: Vec<FieldPrototype>,
    links: Vec<LinkPrototype>,
}

impl Prototype {
    #[must_use]
    pub const fn id(&self) -> &SchemaId {
        &self.id
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldPrototype> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&LinkPrototype> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// All ancestor ids, ordered by increasing distance from the subject.
    #[must_use]
    pub fn ancestor_ids(&self) -> &[SchemaId] {
        &self.ancestors
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldPrototype> {
        self.fields.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkPrototype> {
        self.links.iter()
    }
}

/// Resolve one schema id into its flattened prototype.
pub fn resolve(
    store: &dyn SchemaStore,
    id: &SchemaId,
    policy: MissingBasePolicy,
    sink: &dyn DecodeSink,
) -> Result<Prototype, ResolveError> {
    let subject = store
        .schema(id.as_str())
        .ok_or_else(|| ResolveError::UnknownSchema(id.clone()))?;

    let ancestors = linearize(store, subject, policy, sink)?;

    // Merge farthest ancestor first, the subject last, so each extension
    // overwrites with the more-derived declaration.
    let mut fields: Vec<FieldPrototype> = Vec::new();
    let mut links: Vec<LinkPrototype> = Vec::new();

    for schema_id in ancestors.iter().rev().chain(std::iter::once(id)) {
        let schema = store
            .schema(schema_id.as_str())
            .ok_or_else(|| ResolveError::UnknownSchema(schema_id.clone()))?;

        for field in schema.fields.iter() {
            match fields.iter().position(|f| f.name == field.name) {
                Some(pos) => fields[pos].extend(field, &schema.id),
                None => fields.push(FieldPrototype::new(field, &schema.id)),
            }
        }

        for link in schema.links.iter() {
            match links.iter().position(|l| l.rel == link.rel) {
                Some(pos) => links[pos].extend(link, &schema.id),
                None => links.push(LinkPrototype::new(link, &schema.id)),
            }
        }
    }

    Ok(Prototype {
        id: id.clone(),
        ancestors,
        fields,
        links,
    })
}

/// Breadth-first ancestor linearization.
///
/// Ids are marked visited on enqueue, so diamond graphs contribute each
/// ancestor once and cycles terminate. The subject never appears in its
/// own ancestor list.
fn linearize(
    store: &dyn SchemaStore,
    subject: &Schema,
    policy: MissingBasePolicy,
    sink: &dyn DecodeSink,
) -> Result<Vec<SchemaId>, ResolveError> {
    let mut visited: HashSet<SchemaId> = HashSet::from([subject.id.clone()]);
    let mut queue: VecDeque<(SchemaId, SchemaId)> = VecDeque::new();
    let mut ancestors: Vec<SchemaId> = Vec::new();

    for base in &subject.bases {
        if visited.insert(base.clone()) {
            queue.push_back((base.clone(), subject.id.clone()));
        }
    }

    while let Some((id, referer)) = queue.pop_front() {
        // defensive double-check; enqueue marking already prevents this
        if ancestors.contains(&id) {
            continue;
        }

        let Some(schema) = store.schema(id.as_str()) else {
            match policy {
                MissingBasePolicy::Fail => {
                    return Err(ResolveError::MissingBase {
                        subject: referer,
                        missing: id,
                    });
                }
                MissingBasePolicy::Warn => {
                    sink.on_event(DecodeEvent::ResolutionWarning {
                        subject: referer,
                        missing: id,
                    });
                    continue;
                }
            }
        };

        ancestors.push(id.clone());

        for base in &schema.bases {
            if visited.insert(base.clone()) {
                queue.push_back((base.clone(), id.clone()));
            }
        }
    }

    Ok(ancestors)
}
