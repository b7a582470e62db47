use regex::Regex;
use thiserror::Error;

use crate::history::History;
use crate::schema::Leaf;

/// Configuration problems in a schema. These abort the whole prompt
/// sequence; they are caller bugs, not bad input.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid pattern for '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Verdict for one candidate answer. Rejection is ordinary data and leads
/// to a re-prompt of the same leaf, never to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub valid: bool,
    pub message: Option<String>,
}

impl Outcome {
    pub fn accepted() -> Self {
        Outcome {
            valid: true,
            message: None,
        }
    }

    fn rejected(message: Option<String>) -> Self {
        Outcome {
            valid: false,
            message,
        }
    }
}

/// Trim the raw line and substitute the leaf default when it is empty.
/// Defaults apply before any rule runs.
pub fn resolve(leaf: &Leaf, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if let Some(default) = &leaf.default {
            return default.clone();
        }
    }
    trimmed.to_string()
}

/// Apply the leaf's rules, in order, to an already-resolved value.
pub fn check(leaf: &Leaf, value: &str, history: &History) -> Result<Outcome, SchemaError> {
    if leaf.required && value.is_empty() {
        let message = leaf
            .message
            .clone()
            .unwrap_or_else(|| "You must supply a value.".to_string());
        return Ok(Outcome::rejected(Some(message)));
    }

    if let Some(pattern) = &leaf.pattern {
        let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
            name: leaf.name(),
            source,
        })?;
        if !regex.is_match(value) {
            return Ok(Outcome::rejected(leaf.message.clone()));
        }
    }

    if let Some(predicate) = &leaf.predicate
        && !predicate.eval(value, history)
    {
        return Ok(Outcome::rejected(leaf.message.clone()));
    }

    Ok(Outcome::accepted())
}
