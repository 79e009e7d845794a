mod choice;
mod field;
mod link;
mod schema;

pub use choice::Choice;
pub use field::{Field, FieldList};
pub use link::{Link, LinkList};
pub use schema::Schema;
