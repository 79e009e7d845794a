use crate::{
    MAX_NAME_LEN, MAX_SCHEMA_ID_LEN,
    node::{Choice, Schema},
};
use std::{collections::BTreeSet, fmt};

///
/// ErrorTree
///
/// Accumulates validation findings so a caller sees every problem with a
/// declaration at once instead of the first.
///

#[derive(Debug, Default)]
pub struct ErrorTree {
    errors: Vec<String>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

impl std::error::Error for ErrorTree {}

/// Push a formatted finding onto an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

// ident
fn validate_ident(value: &str, what: &str, max_len: usize, errs: &mut ErrorTree) {
    if value.is_empty() {
        err!(errs, "{what} must not be empty");
    } else if value.len() > max_len {
        err!(errs, "{what} '{value}' exceeds {max_len} bytes");
    }
}

/// Validate one schema declaration in isolation.
///
/// Base references are not chased here; a dangling base surfaces at
/// prototype-resolution time under the resolver's missing-base policy.
pub fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    validate_ident(schema.id.as_str(), "schema id", MAX_SCHEMA_ID_LEN, &mut errs);

    let mut bases = BTreeSet::new();
    for base in &schema.bases {
        validate_ident(base.as_str(), "base schema id", MAX_SCHEMA_ID_LEN, &mut errs);
        if *base == schema.id {
            err!(errs, "schema '{}' lists itself as a base", schema.id);
        }
        if !bases.insert(base.as_str()) {
            err!(errs, "duplicate base '{base}' on schema '{}'", schema.id);
        }
    }

    let mut fields = BTreeSet::new();
    for field in schema.fields.iter() {
        validate_ident(field.name.as_str(), "field name", MAX_NAME_LEN, &mut errs);
        if !fields.insert(field.name.as_str()) {
            err!(
                errs,
                "duplicate field '{}' on schema '{}'",
                field.name,
                schema.id
            );
        }
    }

    let mut rels = BTreeSet::new();
    for link in schema.links.iter() {
        validate_ident(link.rel.as_str(), "link relation", MAX_NAME_LEN, &mut errs);
        if link.href.is_empty() {
            err!(errs, "link '{}' on schema '{}' has an empty href", link.rel, schema.id);
        }
        if !rels.insert(link.rel.as_str()) {
            err!(
                errs,
                "duplicate link relation '{}' on schema '{}'",
                link.rel,
                schema.id
            );
        }
    }

    errs.result()
}

/// Validate one choice declaration in isolation.
pub fn validate_choice(choice: &Choice) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    validate_ident(choice.id.as_str(), "choice id", MAX_SCHEMA_ID_LEN, &mut errs);

    if choice.members.is_empty() {
        err!(errs, "choice '{}' declares no members", choice.id);
    }

    let mut members = BTreeSet::new();
    for member in &choice.members {
        validate_ident(member, "choice member", MAX_NAME_LEN, &mut errs);
        if !members.insert(member.as_str()) {
            err!(
                errs,
                "duplicate member '{member}' on choice '{}'",
                choice.id
            );
        }
    }

    errs.result()
}
