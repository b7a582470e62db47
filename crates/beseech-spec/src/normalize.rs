use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::{Leaf, LeafSpec, Source};

/// Named properties known to the session, consulted for bare-name sources.
pub type Registry = BTreeMap<String, LeafSpec>;

/// Flatten any accepted schema shape into an ordered leaf sequence.
///
/// Order is caller order throughout; nested `properties` trees are walked
/// depth-first with the traversed keys accumulated into each leaf's path.
/// Normalization never fails: entries that fit no shape degrade to an empty
/// leaf named `question`.
pub fn normalize(source: &Source, registry: &Registry) -> Vec<Leaf> {
    let mut leaves = Vec::new();
    collect(source, registry, &mut leaves);
    leaves
}

fn collect(source: &Source, registry: &Registry, out: &mut Vec<Leaf>) {
    match source {
        Source::Name(name) => out.push(named(name, registry)),
        Source::Spec(name, spec) => out.push(spec.clone().into_leaf(Leaf::named(name).path)),
        Source::Leaf(leaf) => out.push(leaf.clone()),
        Source::Many(items) => {
            for item in items {
                collect(item, registry, out);
            }
        }
        Source::Json(value) => collect_json(value, registry, out),
    }
}

fn named(name: &str, registry: &Registry) -> Leaf {
    let key = name.to_lowercase();
    match registry.get(&key) {
        Some(spec) => spec.clone().into_leaf(Leaf::named(&key).path),
        None => Leaf::named(&key),
    }
}

fn collect_json(value: &Value, registry: &Registry, out: &mut Vec<Leaf>) {
    match value {
        Value::String(name) => out.push(named(name, registry)),
        Value::Array(items) => {
            for item in items {
                collect_entry(item, registry, out);
            }
        }
        Value::Object(map) => match map.get("properties") {
            Some(Value::Object(props)) => descend(&mut Vec::new(), props, out),
            _ => {
                for (key, node) in map {
                    if let Some(Value::Object(nested)) = node.get("properties") {
                        descend(&mut vec![key.clone()], nested, out);
                    } else {
                        out.push(leaf_from_node(Leaf::named(key).path, node));
                    }
                }
            }
        },
        _ => out.push(Leaf::named("question")),
    }
}

/// One entry of a mixed list: a bare name, an inline `{name, ...}` object,
/// a nested tree, or an already-normalized `{path, schema}` pair.
fn collect_entry(entry: &Value, registry: &Registry, out: &mut Vec<Leaf>) {
    match entry {
        Value::String(name) => out.push(named(name, registry)),
        Value::Object(map) => {
            if let Some(leaf) = normalized_entry(map) {
                out.push(leaf);
            } else if let Some(Value::Object(props)) = map.get("properties") {
                descend(&mut Vec::new(), props, out);
            } else if let Some(Value::String(name)) = map.get("name") {
                out.push(leaf_from_node(Leaf::named(name).path, entry));
            } else {
                out.push(Leaf::named("question"));
            }
        }
        _ => out.push(Leaf::named("question")),
    }
}

/// `{path: [..], schema: {..}}` entries pass through unchanged, which lets a
/// caller re-submit a single normalized leaf.
fn normalized_entry(map: &Map<String, Value>) -> Option<Leaf> {
    let path = map
        .get("path")?
        .as_array()?
        .iter()
        .map(|segment| segment.as_str().map(String::from))
        .collect::<Option<Vec<_>>>()?;
    if path.is_empty() {
        return None;
    }
    let spec = match map.get("schema") {
        Some(node) => serde_json::from_value::<LeafSpec>(node.clone()).ok()?,
        None => LeafSpec::default(),
    };
    Some(spec.into_leaf(path))
}

fn descend(prefix: &mut Vec<String>, props: &Map<String, Value>, out: &mut Vec<Leaf>) {
    for (key, node) in props {
        if let Some(Value::Object(nested)) = node.get("properties") {
            prefix.push(key.clone());
            descend(prefix, nested, out);
            prefix.pop();
        } else {
            let mut path = prefix.clone();
            path.push(key.clone());
            out.push(leaf_from_node(path, node));
        }
    }
}

fn leaf_from_node(path: Vec<String>, node: &Value) -> Leaf {
    match node {
        Value::Object(_) => match serde_json::from_value::<LeafSpec>(node.clone()) {
            Ok(spec) => spec.into_leaf(path),
            Err(_) => Leaf::named("question"),
        },
        _ => Leaf::named("question"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_name_without_registry_entry_is_an_empty_leaf() {
        let leaves = normalize(&Source::from("Username"), &Registry::new());
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].name(), "username");
        assert!(!leaves[0].required);
        assert!(leaves[0].pattern.is_none());
    }

    #[test]
    fn bare_name_resolves_against_registry() {
        let mut registry = Registry::new();
        registry.insert(
            "email".into(),
            LeafSpec::new().pattern("@").warning("Must be an email"),
        );
        let leaves = normalize(&Source::from("email"), &registry);
        assert_eq!(leaves[0].pattern.as_deref(), Some("@"));
        assert_eq!(leaves[0].message.as_deref(), Some("Must be an email"));
    }

    #[test]
    fn flat_map_translates_legacy_fields() {
        let schema = json!({
            "code": {
                "validator": "^\\w+$",
                "warning": "letters and numbers only",
                "empty": false,
                "hidden": true
            }
        });
        let leaves = normalize(&Source::from(schema), &Registry::new());
        assert_eq!(leaves.len(), 1);
        let leaf = &leaves[0];
        assert_eq!(leaf.name(), "code");
        assert_eq!(leaf.pattern.as_deref(), Some("^\\w+$"));
        assert_eq!(leaf.message.as_deref(), Some("letters and numbers only"));
        assert!(leaf.required);
        assert!(leaf.hidden);
    }

    #[test]
    fn help_lines_carry_through_to_the_leaf() {
        let schema = json!({
            "proxy": {
                "help": ["Proxy url and port for the app.", "Should be a valid web address."],
                "default": "http://localhost:8080"
            }
        });
        let leaves = normalize(&Source::from(schema), &Registry::new());
        assert_eq!(
            leaves[0].help,
            vec![
                "Proxy url and port for the app.",
                "Should be a valid web address."
            ]
        );
    }

    #[test]
    fn nested_properties_accumulate_paths_in_order() {
        let schema = json!({
            "properties": {
                "url": { "required": true },
                "auth": {
                    "properties": {
                        "username": { "required": true },
                        "password": { "required": true, "hidden": true }
                    }
                }
            }
        });
        let leaves = normalize(&Source::from(schema), &Registry::new());
        let names = leaves.iter().map(Leaf::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["url", "auth.username", "auth.password"]);
        assert!(leaves[2].hidden);
    }

    #[test]
    fn mixed_list_preserves_caller_order() {
        let schema = json!([
            "username",
            { "name": "password", "hidden": true },
            { "properties": { "invite": { "pattern": "^\\w+$" } } }
        ]);
        let leaves = normalize(&Source::from(schema), &Registry::new());
        let names = leaves.iter().map(Leaf::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["username", "password", "invite"]);
        assert!(leaves[1].hidden);
    }

    #[test]
    fn normalized_pairs_pass_through() {
        let schema = json!([
            { "path": ["auth", "user"], "schema": { "required": true } }
        ]);
        let leaves = normalize(&Source::from(schema), &Registry::new());
        assert_eq!(leaves[0].path, vec!["auth", "user"]);
        assert!(leaves[0].required);
    }

    #[test]
    fn malformed_entries_degrade_to_question() {
        let leaves = normalize(&Source::from(json!([42])), &Registry::new());
        assert_eq!(leaves[0].name(), "question");
    }

    #[test]
    fn typed_leaf_passes_through() {
        let leaf = LeafSpec::new().required(true).into_leaf(vec!["animal".into()]);
        let leaves = normalize(&Source::from(leaf), &Registry::new());
        assert_eq!(leaves[0].name(), "animal");
        assert!(leaves[0].required);
    }
}
