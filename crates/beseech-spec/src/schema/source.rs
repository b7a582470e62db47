use serde_json::Value;

use crate::schema::leaf::{Leaf, LeafSpec};

/// The schema shapes callers may hand to `get`.
///
/// Every variant normalizes to the same ordered `Leaf` sequence; the rest of
/// the engine never sees the original shape.
#[derive(Debug, Clone)]
pub enum Source {
    /// Bare property name, resolved against the session's named-property
    /// registry when one is defined there.
    Name(String),
    /// Inline name + spec pair (the flat legacy shape, typed).
    Spec(String, LeafSpec),
    /// JSON document: either a flat name→spec map or a nested tree of
    /// `properties` maps of arbitrary depth.
    Json(Value),
    /// Already-normalized leaf; passes through unchanged so a single leaf
    /// can be re-submitted when retrying.
    Leaf(Leaf),
    /// Ordered mix of any of the above.
    Many(Vec<Source>),
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Name(name.to_string())
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Name(name)
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Json(value)
    }
}

impl From<Leaf> for Source {
    fn from(leaf: Leaf) -> Self {
        Source::Leaf(leaf)
    }
}

impl From<(String, LeafSpec)> for Source {
    fn from((name, spec): (String, LeafSpec)) -> Self {
        Source::Spec(name, spec)
    }
}

impl From<(&str, LeafSpec)> for Source {
    fn from((name, spec): (&str, LeafSpec)) -> Self {
        Source::Spec(name.to_string(), spec)
    }
}

impl<T: Into<Source>> From<Vec<T>> for Source {
    fn from(items: Vec<T>) -> Self {
        Source::Many(items.into_iter().map(Into::into).collect())
    }
}
