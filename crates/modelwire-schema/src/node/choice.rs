use crate::ident::ChoiceId;
use serde::Serialize;

///
/// Choice
///
/// A named enumeration kind: ordered member names, referenced from field
/// declarations by id.
///

#[derive(Clone, Debug, Serialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub members: Vec<String>,
}

impl Choice {
    #[must_use]
    pub fn new<M: Into<String>>(
        id: impl Into<ChoiceId>,
        members: impl IntoIterator<Item = M>,
    ) -> Self {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&str> {
        self.members.iter().map(String::as_str).find(|m| *m == name)
    }

    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}
