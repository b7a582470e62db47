use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::history::History;

/// Custom acceptance check for a single leaf.
///
/// Collapses the two validator forms accepted by schemas (a plain value
/// check and a check that consults earlier answers) into one callable: the
/// history argument carries the context a cross-leaf validator needs.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&str, &History) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&str, &History) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(check))
    }

    /// Convenience constructor for checks that ignore history.
    pub fn value<F>(check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(move |value, _| check(value)))
    }

    pub fn eval(&self, value: &str, history: &History) -> bool {
        (self.0)(value, history)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// One promptable property after normalization, located by its path.
#[derive(Debug, Clone)]
pub struct Leaf {
    /// Nesting keys locating the value in the result object. Never empty;
    /// the last segment is the property key.
    pub path: Vec<String>,
    pub description: Option<String>,
    /// Explanatory lines written above the prompt on every render.
    pub help: Vec<String>,
    pub default: Option<String>,
    pub required: bool,
    pub hidden: bool,
    /// Uncompiled regular expression; compiled at validation time so a bad
    /// pattern surfaces as a configuration error rather than a panic.
    pub pattern: Option<String>,
    pub predicate: Option<Predicate>,
    /// Message emitted when validation rejects the answer.
    pub message: Option<String>,
}

impl Leaf {
    /// Leaf with no validation rules. Dotted names become nested paths.
    pub fn named(name: &str) -> Self {
        let path = name
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();
        Leaf {
            path: if path.is_empty() {
                vec![name.to_string()]
            } else {
                path
            },
            description: None,
            help: Vec::new(),
            default: None,
            required: false,
            hidden: false,
            pattern: None,
            predicate: None,
            message: None,
        }
    }

    /// Full dotted name of the leaf.
    pub fn name(&self) -> String {
        self.path.join(".")
    }

    /// Last path segment: the property key in its parent object.
    pub fn key(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("question")
    }
}

/// Per-property schema as written by callers, in JSON or via the builder.
///
/// Accepts both the current field names and the legacy aliases from older
/// schemas (`validator` for `pattern`, `warning` for the rejection message,
/// `message` for the display text, `empty: false` for `required: true`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LeafSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Legacy alias for `description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Lines printed above the prompt, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Legacy inverse of `required`: `empty: false` means required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Legacy alias for `pattern`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    /// Message shown when the answer is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    #[schemars(skip)]
    pub check: Option<Predicate>,
}

impl LeafSpec {
    pub fn new() -> Self {
        LeafSpec::default()
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn help<I>(mut self, lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.help = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn warning(mut self, message: impl Into<String>) -> Self {
        self.warning = Some(message.into());
        self
    }

    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.check = Some(predicate);
        self
    }

    /// Resolve the legacy aliases and bind the spec to a path.
    pub fn into_leaf(self, path: Vec<String>) -> Leaf {
        let required = self
            .required
            .unwrap_or_else(|| self.empty == Some(false));
        Leaf {
            path,
            description: self.description.or(self.message),
            help: self.help,
            default: self.default,
            required,
            hidden: self.hidden,
            pattern: self.pattern.or(self.validator),
            predicate: self.check,
            message: self.warning,
        }
    }
}
