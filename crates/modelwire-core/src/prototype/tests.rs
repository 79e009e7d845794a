use super::*;
use crate::obs::NullSink;
use modelwire_schema::{
    node::{Field, Link, Schema},
    store::MemoryStore,
    types::{KindRef, Primitive},
};
use proptest::prelude::*;
use std::sync::Mutex;

fn text() -> KindRef {
    KindRef::primitive(Primitive::Text)
}

fn integer() -> KindRef {
    KindRef::primitive(Primitive::Integer)
}

fn resolve_ok(store: &MemoryStore, id: &str) -> Prototype {
    resolve(
        store,
        &SchemaId::new(id),
        MissingBasePolicy::Fail,
        &NullSink,
    )
    .unwrap()
}

#[test]
fn ancestors_are_ordered_closest_first() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:root"))
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:mid").with_base("urn:t:root"))
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:leaf").with_base("urn:t:mid"))
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:leaf");

    assert_eq!(proto.ancestor_ids().len(), 2);
    assert_eq!(proto.ancestor_ids()[0], "urn:t:mid");
    assert_eq!(proto.ancestor_ids()[1], "urn:t:root");
}

#[test]
fn subject_never_appears_in_its_own_ancestors() {
    let mut store = MemoryStore::new();
    store.insert_schema(Schema::new("urn:t:base")).unwrap();
    store
        .insert_schema(Schema::new("urn:t:s").with_base("urn:t:base"))
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:s");

    assert!(proto.ancestor_ids().iter().all(|a| *a != "urn:t:s"));
}

#[test]
fn diamond_ancestor_appears_once() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:root").with_field(Field::new("y", text())))
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:a").with_base("urn:t:root"))
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:b").with_base("urn:t:root"))
        .unwrap();
    store
        .insert_schema(
            Schema::new("urn:t:s")
                .with_base("urn:t:a")
                .with_base("urn:t:b"),
        )
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:s");

    let root_count = proto
        .ancestor_ids()
        .iter()
        .filter(|a| **a == "urn:t:root")
        .count();
    assert_eq!(root_count, 1);

    // the diamond contributes `y` exactly once
    assert_eq!(proto.fields().filter(|f| f.name == "y").count(), 1);
    assert_eq!(proto.field("y").unwrap().owner, "urn:t:root");
}

#[test]
fn cyclic_bases_terminate() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:a").with_base("urn:t:b"))
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:b").with_base("urn:t:a"))
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:a");

    assert_eq!(proto.ancestor_ids().len(), 1);
    assert_eq!(proto.ancestor_ids()[0], "urn:t:b");
}

#[test]
fn most_derived_declaration_wins() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:a").with_field(Field::new("x", integer()).required()))
        .unwrap();
    store.insert_schema(Schema::new("urn:t:b")).unwrap();
    store
        .insert_schema(
            Schema::new("urn:t:s")
                .with_base("urn:t:a")
                .with_base("urn:t:b")
                .with_field(Field::new("x", text())),
        )
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:s");
    let x = proto.field("x").unwrap();

    assert_eq!(x.kind, text());
    assert_eq!(x.owner, "urn:t:s");
    // redeclaration replaces every attribute, flags included
    assert!(!x.required);
}

#[test]
fn ancestor_only_field_keeps_ancestor_definition() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(
            Schema::new("urn:t:a")
                .with_field(Field::new("kept", integer()).titled("from a")),
        )
        .unwrap();
    store
        .insert_schema(Schema::new("urn:t:s").with_base("urn:t:a"))
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:s");
    let kept = proto.field("kept").unwrap();

    assert_eq!(kept.kind, integer());
    assert_eq!(kept.owner, "urn:t:a");
    assert_eq!(kept.title.as_deref(), Some("from a"));
}

#[test]
fn links_override_by_relation_id() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(
            Schema::new("urn:t:a")
                .with_link(Link::new("self", "/a/{id}"))
                .with_link(Link::new("edit", "/a/{id}/edit")),
        )
        .unwrap();
    store
        .insert_schema(
            Schema::new("urn:t:s")
                .with_base("urn:t:a")
                .with_link(Link::new("self", "/s/{id}")),
        )
        .unwrap();

    let proto = resolve_ok(&store, "urn:t:s");

    assert_eq!(proto.link("self").unwrap().href, "/s/{id}");
    assert_eq!(proto.link("self").unwrap().owner, "urn:t:s");
    assert_eq!(proto.link("edit").unwrap().href, "/a/{id}/edit");
}

#[test]
fn unknown_subject_fails() {
    let store = MemoryStore::new();

    let err = resolve(
        &store,
        &SchemaId::new("urn:t:nope"),
        MissingBasePolicy::Fail,
        &NullSink,
    )
    .unwrap_err();

    assert!(matches!(err, ResolveError::UnknownSchema(_)));
}

#[test]
fn missing_base_fails_by_default() {
    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:s").with_base("urn:t:gone"))
        .unwrap();

    let err = resolve(
        &store,
        &SchemaId::new("urn:t:s"),
        MissingBasePolicy::Fail,
        &NullSink,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::MissingBase { subject, missing }
            if subject == "urn:t:s" && missing == "urn:t:gone"
    ));
}

#[test]
fn missing_base_warns_and_degrades_under_warn_policy() {
    struct Capture(Mutex<Vec<DecodeEvent>>);

    impl DecodeSink for Capture {
        fn on_event(&self, event: DecodeEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    let mut store = MemoryStore::new();
    store
        .insert_schema(Schema::new("urn:t:present").with_field(Field::new("a", text())))
        .unwrap();
    store
        .insert_schema(
            Schema::new("urn:t:s")
                .with_base("urn:t:present")
                .with_base("urn:t:gone"),
        )
        .unwrap();

    let sink = Capture(Mutex::new(Vec::new()));
    let proto = resolve(
        &store,
        &SchemaId::new("urn:t:s"),
        MissingBasePolicy::Warn,
        &sink,
    )
    .unwrap();

    // the surviving branch still contributes
    assert!(proto.field("a").is_some());
    assert_eq!(proto.ancestor_ids().len(), 1);

    let events = sink.0.into_inner().unwrap();
    assert!(matches!(
        events.as_slice(),
        [DecodeEvent::ResolutionWarning { subject, missing }]
            if *subject == "urn:t:s" && *missing == "urn:t:gone"
    ));
}

proptest! {
    /// Linearization terminates on arbitrary graphs, including cycles and
    /// self-references, visiting each distinct ancestor at most once.
    #[test]
    fn linearization_terminates_and_deduplicates(
        bases in prop::collection::vec(
            prop::collection::vec(0usize..8, 0..4),
            8,
        ),
    ) {
        let mut store = MemoryStore::new();
        for (i, base_list) in bases.iter().enumerate() {
            let mut schema = Schema::new(format!("urn:p:{i}"));
            let mut seen = std::collections::BTreeSet::new();
            for base in base_list {
                // self-bases and duplicates are rejected by the validating
                // store, so feed it a clean declaration and rely on graph
                // shape (cycles, diamonds) for the interesting cases
                if *base != i && seen.insert(*base) {
                    schema = schema.with_base(format!("urn:p:{base}"));
                }
            }
            store.insert_schema(schema).unwrap();
        }

        let proto = resolve(
            &store,
            &SchemaId::new("urn:p:0"),
            MissingBasePolicy::Fail,
            &NullSink,
        )
        .unwrap();

        let ancestors = proto.ancestor_ids();
        let unique: std::collections::BTreeSet<_> = ancestors.iter().collect();

        prop_assert_eq!(unique.len(), ancestors.len());
        prop_assert!(ancestors.iter().all(|a| *a != "urn:p:0"));
        prop_assert!(ancestors.len() < 8);
    }
}
