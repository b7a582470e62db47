use serde_json::{Map, Value};

/// Folds accepted `(path, value)` pairs into one nested JSON object.
///
/// Leaves sharing a path prefix reuse the same sub-object; sibling keys are
/// never clobbered. An intermediate segment that already holds a non-object
/// value is silently replaced by an object, a quirk carried over from the
/// source implementation.
#[derive(Debug, Default)]
pub struct Assembler {
    root: Map<String, Value>,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler::default()
    }

    pub fn accept(&mut self, path: &[String], value: Value) {
        let mut root = Value::Object(std::mem::take(&mut self.root));
        put(&mut root, path, value);
        if let Value::Object(map) = root {
            self.root = map;
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

/// Walk/create nested objects along `path[..n-1]`, then assign at the last
/// segment.
pub fn put(target: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut cursor = target;
    for segment in parents {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        let map = cursor.as_object_mut().expect("cursor was just made an object");
        cursor = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !cursor.is_object() {
        *cursor = Value::Object(Map::new());
    }
    if let Some(map) = cursor.as_object_mut() {
        map.insert(last.clone(), value);
    }
}

/// Deep-merge `addition` into `target`, recursing through objects and
/// otherwise overwriting. Used when writing prompted answers back onto a
/// caller-supplied object.
pub fn merge(target: &mut Value, addition: &Value) {
    match addition {
        Value::Object(entries) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            let map = target.as_object_mut().expect("target was just made an object");
            for (key, node) in entries {
                match map.get_mut(key) {
                    Some(existing) if node.is_object() => merge(existing, node),
                    _ => {
                        map.insert(key.clone(), node.clone());
                    }
                }
            }
        }
        other => *target = other.clone(),
    }
}
