//! Ordered, one-at-a-time traversal of normalized leaves.
//!
//! Each leaf runs the RENDER → READ → VALIDATE machine: render the prompt,
//! read a visible or masked line, validate, and on rejection re-render the
//! same leaf. Retries are unbounded by contract; only stream failures and
//! schema configuration errors abort the sequence.

use std::io::Write;

use regex::Regex;
use serde_json::Value;

use beseech_spec::{Assembler, Leaf, SchemaError, Source, merge, normalize, validate};

use crate::error::Error;
use crate::session::{Event, Session};

/// One yes/no question for [`Session::confirm`].
///
/// `pattern` gates which answers are accepted at all; `yes` decides whether
/// an accepted answer counts as affirmative.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub description: String,
    pub pattern: String,
    pub yes: String,
}

impl Confirmation {
    pub fn new(description: impl Into<String>) -> Self {
        Confirmation {
            description: description.into(),
            pattern: "(?i)^[yntf]".to_string(),
            yes: "(?i)^[yt]".to_string(),
        }
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn yes(mut self, yes: impl Into<String>) -> Self {
        self.yes = yes.into();
        self
    }
}

impl From<&str> for Confirmation {
    fn from(description: &str) -> Self {
        Confirmation::new(description)
    }
}

impl From<String> for Confirmation {
    fn from(description: String) -> Self {
        Confirmation::new(description)
    }
}

impl Session {
    /// Prompt for every leaf of `schema`, in order, and assemble the
    /// accepted answers into a nested object.
    ///
    /// Leaf N+1 is never read before leaf N is accepted, so validators may
    /// consult earlier answers through the history store.
    pub fn get(&mut self, schema: impl Into<Source>) -> Result<Value, Error> {
        let source = schema.into();
        let leaves = normalize(&source, &self.registry);
        let mut assembler = Assembler::new();
        for leaf in &leaves {
            let value = self.ask(leaf)?;
            assembler.accept(&leaf.path, Value::String(value));
        }
        Ok(assembler.into_value())
    }

    /// Ask the yes/no questions in order. The first negative answer makes
    /// the whole confirmation negative without asking the rest.
    pub fn confirm<I>(&mut self, prompts: I) -> Result<bool, Error>
    where
        I: IntoIterator,
        I::Item: Into<Confirmation>,
    {
        for prompt in prompts {
            let confirmation = prompt.into();
            let leaf = beseech_spec::LeafSpec::new()
                .description(confirmation.description.clone())
                .required(true)
                .pattern(confirmation.pattern.clone())
                .into_leaf(vec!["confirm".to_string()]);
            let answer = self.ask(&leaf)?;
            let yes = Regex::new(&confirmation.yes).map_err(|source| {
                Error::Schema(SchemaError::InvalidPattern {
                    name: "confirm".to_string(),
                    source,
                })
            })?;
            if !yes.is_match(&answer) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Prompt only for the named properties missing on `target` and write
    /// the accepted answers back onto it. Dotted names nest; present keys
    /// are left untouched.
    pub fn add_properties(&mut self, target: &mut Value, names: &[&str]) -> Result<(), Error> {
        let missing = names
            .iter()
            .filter(|name| lookup_dotted(target, name).is_none())
            .map(|name| Source::from(*name))
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }
        let answers = self.get(Source::Many(missing))?;
        merge(target, &answers);
        Ok(())
    }

    /// Run one leaf to acceptance. An override for the leaf's dotted name
    /// bypasses render/read/validate entirely and is used verbatim.
    fn ask(&mut self, leaf: &Leaf) -> Result<String, Error> {
        let name = leaf.name();
        if let Some(value) = self.overrides.get(&name).cloned() {
            self.history.remember(name, value.clone());
            return Ok(value);
        }

        loop {
            self.render(leaf)?;
            let line = if leaf.hidden {
                let mut sink = self.output.lock().expect("output sink poisoned");
                self.reader.read_line_hidden(&mut **sink)?
            } else {
                self.reader.read_line()?
            };
            let value = validate::resolve(leaf, &line);
            let outcome = validate::check(leaf, &value, &self.history)?;
            if outcome.valid {
                self.history.remember(name, value.clone());
                return Ok(value);
            }
            {
                let mut sink = self.output.lock().expect("output sink poisoned");
                writeln!(sink, "Invalid input for {}", display_label(leaf))?;
                if let Some(message) = &outcome.message {
                    writeln!(sink, "{}", message)?;
                }
            }
            self.emit(Event::Invalid {
                name: name.clone(),
                line,
            });
        }
    }

    /// Write the help lines and the visible prompt, then announce the leaf.
    fn render(&mut self, leaf: &Leaf) -> Result<(), Error> {
        let mut text = format!(
            "{}{}{}",
            self.message_prefix,
            self.delimiter,
            display_label(leaf)
        );
        if let Some(default) = &leaf.default {
            text.push_str(&format!(" ({})", default));
        }
        text.push_str(&self.delimiter);
        {
            let mut sink = self.output.lock().expect("output sink poisoned");
            for line in &leaf.help {
                writeln!(sink, "{}", line)?;
            }
            write!(sink, "{}", text)?;
            sink.flush()?;
        }
        self.emit(Event::Prompt { name: leaf.name() });
        Ok(())
    }
}

fn display_label(leaf: &Leaf) -> String {
    leaf.description
        .clone()
        .unwrap_or_else(|| capitalize(leaf.key()))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lookup_dotted<'a>(target: &'a Value, name: &str) -> Option<&'a Value> {
    let pointer = format!("/{}", name.replace('.', "/"));
    target.pointer(&pointer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_uppercases_the_first_character() {
        assert_eq!(capitalize("username"), "Username");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn dotted_lookup_walks_nested_objects() {
        let target = serde_json::json!({ "auth": { "user": "amy" } });
        assert!(lookup_dotted(&target, "auth.user").is_some());
        assert!(lookup_dotted(&target, "auth.token").is_none());
    }
}
