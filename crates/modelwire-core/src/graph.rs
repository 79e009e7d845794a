//! Decode-session model graph.
//!
//! The graph arena-owns every model built from one input document and
//! tracks the focus path from the root model to the model currently
//! receiving field assignments. A graph serves exactly one decode at a
//! time; it is not reentrant.

use crate::value::Value;
use modelwire_schema::ident::{FieldName, SchemaId};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error as ThisError;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

///
/// GraphError
///
/// Internal-consistency violations. These indicate a decoder bug, never
/// bad input; callers abort the operation.
///

#[derive(Debug, ThisError)]
pub enum GraphError {
    #[error("focus stack is empty")]
    NotFocused,

    #[error("model {model} is not owned by graph {graph}")]
    ForeignModel { model: ModelId, graph: u64 },
}

///
/// ModelId
///
/// Handle to a model inside one graph. Carries its owning graph's id so
/// cross-graph use is detected instead of silently indexing wrong.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ModelId {
    graph: u64,
    index: u32,
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.graph, self.index)
    }
}

///
/// ModelLink
///
/// Hypermedia link instance decoded from a wire `"links"` entry.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelLink {
    pub rel: String,
    pub href: String,
    pub accepts: Vec<String>,
    pub returns: Vec<String>,
}

///
/// Model
///
/// A live instance conforming to one schema. Created empty and populated
/// field-by-field; field order is assignment order.
///

#[derive(Clone, Debug)]
pub struct Model {
    native_type: SchemaId,
    fields: Vec<(FieldName, Value)>,
    links: Vec<ModelLink>,
}

impl Model {
    fn new(native_type: SchemaId) -> Self {
        Self {
            native_type,
            fields: Vec::new(),
            links: Vec::new(),
        }
    }

    #[must_use]
    pub const fn native_type(&self) -> &SchemaId {
        &self.native_type
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(n, v)| (*n == *name).then_some(v))
    }

    /// Assign a field value, replacing any previous assignment.
    pub(crate) fn set(&mut self, name: FieldName, value: Value) {
        match self.fields.iter().position(|(n, _)| *n == name) {
            Some(pos) => self.fields[pos].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub(crate) fn add_links(&mut self, links: impl IntoIterator<Item = ModelLink>) {
        self.links.extend(links);
    }

    #[must_use]
    pub fn links(&self) -> &[ModelLink] {
        &self.links
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &Value)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// FocusFrame
///

#[derive(Clone, Debug)]
struct FocusFrame {
    model: ModelId,
    relationship: String,
}

///
/// ModelGraph
///

#[derive(Debug)]
pub struct ModelGraph {
    id: u64,
    models: Vec<Model>,
    focus: Vec<FocusFrame>,
}

impl Default for ModelGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            models: Vec::new(),
            focus: Vec::new(),
        }
    }

    /// Create an empty model tagged with its conforming schema.
    pub fn create(&mut self, native_type: SchemaId) -> ModelId {
        let id = ModelId {
            graph: self.id,
            index: u32::try_from(self.models.len()).expect("model arena exceeded u32::MAX entries"),
        };
        self.models.push(Model::new(native_type));

        id
    }

    #[must_use]
    pub const fn owns(&self, id: ModelId) -> bool {
        id.graph == self.id
    }

    pub fn model(&self, id: ModelId) -> Result<&Model, GraphError> {
        if !self.owns(id) {
            return Err(GraphError::ForeignModel {
                model: id,
                graph: self.id,
            });
        }

        Ok(&self.models[id.index as usize])
    }

    pub fn model_mut(&mut self, id: ModelId) -> Result<&mut Model, GraphError> {
        if !self.owns(id) {
            return Err(GraphError::ForeignModel {
                model: id,
                graph: self.id,
            });
        }

        Ok(&mut self.models[id.index as usize])
    }

    /// Push a new focus; the model becomes the current write target.
    pub fn push_focus(
        &mut self,
        model: ModelId,
        relationship: impl Into<String>,
    ) -> Result<(), GraphError> {
        if !self.owns(model) {
            return Err(GraphError::ForeignModel {
                model,
                graph: self.id,
            });
        }

        self.focus.push(FocusFrame {
            model,
            relationship: relationship.into(),
        });

        Ok(())
    }

    /// Pop the current focus. An empty stack afterwards means the root
    /// model is fully decoded.
    pub fn pop_focus(&mut self) -> Result<ModelId, GraphError> {
        self.focus
            .pop()
            .map(|frame| frame.model)
            .ok_or(GraphError::NotFocused)
    }

    pub fn current_focus(&self) -> Result<ModelId, GraphError> {
        self.focus
            .last()
            .map(|frame| frame.model)
            .ok_or(GraphError::NotFocused)
    }

    #[must_use]
    pub fn current_relationship(&self) -> Option<&str> {
        self.focus.last().map(|frame| frame.relationship.as_str())
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        !self.focus.is_empty()
    }

    /// Current nesting depth of the focus path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.focus.len()
    }

    /// Number of models owned by this graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(id: &str) -> SchemaId {
        SchemaId::new(id)
    }

    #[test]
    fn focus_stack_transitions() {
        let mut graph = ModelGraph::new();
        assert!(!graph.is_focused());

        let root = graph.create(ty("urn:t:root"));
        graph.push_focus(root, "$").unwrap();
        assert_eq!(graph.current_focus().unwrap(), root);
        assert_eq!(graph.current_relationship(), Some("$"));

        let child = graph.create(ty("urn:t:child"));
        graph.push_focus(child, "author").unwrap();
        assert_eq!(graph.current_focus().unwrap(), child);
        assert_eq!(graph.depth(), 2);

        assert_eq!(graph.pop_focus().unwrap(), child);
        assert_eq!(graph.current_focus().unwrap(), root);

        assert_eq!(graph.pop_focus().unwrap(), root);
        assert!(!graph.is_focused());
        assert!(matches!(graph.pop_focus(), Err(GraphError::NotFocused)));
    }

    #[test]
    fn foreign_model_is_rejected() {
        let mut a = ModelGraph::new();
        let mut b = ModelGraph::new();

        let from_b = b.create(ty("urn:t:x"));

        assert!(!a.owns(from_b));
        assert!(matches!(
            a.push_focus(from_b, "x"),
            Err(GraphError::ForeignModel { .. })
        ));
        assert!(matches!(
            a.model(from_b),
            Err(GraphError::ForeignModel { .. })
        ));
    }

    #[test]
    fn field_assignment_replaces_by_name() {
        let mut graph = ModelGraph::new();
        let id = graph.create(ty("urn:t:doc"));

        let model = graph.model_mut(id).unwrap();
        model.set(FieldName::new("title"), Value::Text("a".into()));
        model.set(FieldName::new("title"), Value::Text("b".into()));

        assert_eq!(model.len(), 1);
        assert_eq!(graph.model(id).unwrap().get("title").unwrap().as_text(), Some("b"));
    }
}
