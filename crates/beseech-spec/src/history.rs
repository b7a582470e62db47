/// One answered property, most recent first in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub property: String,
    pub value: String,
}

/// Key accepted by [`History::lookup`]: a recency offset or a property name.
#[derive(Debug, Clone)]
pub enum Lookup {
    Index(usize),
    Name(String),
}

impl From<usize> for Lookup {
    fn from(index: usize) -> Self {
        Lookup::Index(index)
    }
}

impl From<&str> for Lookup {
    fn from(name: &str) -> Self {
        Lookup::Name(name.to_string())
    }
}

impl From<String> for Lookup {
    fn from(name: String) -> Self {
        Lookup::Name(name)
    }
}

/// Bounded recency buffer of answered properties.
///
/// Consulted by predicates that need cross-leaf context; the sequencer
/// appends after every accepted answer and truncates to the configured
/// capacity.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Entry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new(10)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Prepend an answered property, dropping the oldest past capacity.
    pub fn remember(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(
            0,
            Entry {
                property: property.into(),
                value: value.into(),
            },
        );
        self.entries.truncate(self.capacity);
    }

    /// Most recent entry at a recency offset (0 = most recent) or the most
    /// recent entry for a property name. `None` when nothing matches.
    pub fn lookup(&self, key: impl Into<Lookup>) -> Option<&Entry> {
        match key.into() {
            Lookup::Index(index) => self.entries.get(index),
            Lookup::Name(name) => self.entries.iter().find(|entry| entry.property == name),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_prepends_and_truncates() {
        let mut history = History::new(2);
        history.remember("a", "1");
        history.remember("b", "2");
        history.remember("c", "3");
        assert_eq!(history.len(), 2);
        assert_eq!(history.lookup(0usize).unwrap().property, "c");
        assert_eq!(history.lookup(1usize).unwrap().property, "b");
        assert!(history.lookup(2usize).is_none());
    }

    #[test]
    fn name_lookup_returns_most_recent_match() {
        let mut history = History::default();
        history.remember("animal", "cat");
        history.remember("sound", "meow");
        history.remember("animal", "dog");
        assert_eq!(history.lookup("animal").unwrap().value, "dog");
        assert!(history.lookup("color").is_none());
    }
}
