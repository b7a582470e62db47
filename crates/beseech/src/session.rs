//! Process-facing prompt session: streams, flags, registry, and events.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process;
use std::sync::{Arc, Mutex};

use beseech_spec::{Entry, History, LeafSpec, Lookup, Registry};

use crate::reader::{InputSource, Reader, StdinSource};

/// Observable lifecycle and per-leaf notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Pause,
    Resume,
    /// A leaf is about to be rendered.
    Prompt { name: String },
    /// Validation rejected the raw line; the same leaf will be asked again.
    Invalid { name: String, line: String },
}

type Observer = Box<dyn FnMut(&Event) + Send>;

/// Output sink shared between the sequencer and the interrupt handler.
pub(crate) type OutputSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Session configuration. Streams default to stdio.
pub struct Options {
    pub input: Option<Box<dyn InputSource>>,
    pub output: Option<Box<dyn Write + Send>>,
    pub allow_empty: bool,
    pub memory_size: usize,
    pub message_prefix: String,
    pub delimiter: String,
    pub overrides: BTreeMap<String, String>,
    pub handle_interrupt: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            input: None,
            output: None,
            allow_empty: false,
            memory_size: 10,
            message_prefix: "prompt".to_string(),
            delimiter: ": ".to_string(),
            overrides: BTreeMap::new(),
            handle_interrupt: false,
        }
    }
}

impl Options {
    pub fn input(mut self, source: impl InputSource + 'static) -> Self {
        self.input = Some(Box::new(source));
        self
    }

    pub fn output(mut self, sink: impl Write + Send + 'static) -> Self {
        self.output = Some(Box::new(sink));
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn memory_size(mut self, size: usize) -> Self {
        self.memory_size = size;
        self
    }

    pub fn message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Pre-seed an answer: the sequencer uses it verbatim and never prompts
    /// for the matching leaf.
    pub fn override_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    pub fn handle_interrupt(mut self, handle: bool) -> Self {
        self.handle_interrupt = handle;
        self
    }
}

/// One prompting session: owns the reader, output sink, answer history,
/// named-property registry, overrides, and the started/paused flags.
///
/// All prompting runs through one session so there are no hidden globals;
/// the sequencer methods live in [`crate::sequencer`].
pub struct Session {
    pub(crate) started: bool,
    pub(crate) paused: bool,
    pub(crate) allow_empty: bool,
    pub(crate) message_prefix: String,
    pub(crate) delimiter: String,
    pub(crate) reader: Reader,
    pub(crate) output: OutputSink,
    pub(crate) history: History,
    pub(crate) registry: Registry,
    pub(crate) overrides: BTreeMap<String, String>,
    observers: Vec<Observer>,
    handle_interrupt: bool,
}

impl Session {
    pub fn new(options: Options) -> Self {
        let input = options
            .input
            .unwrap_or_else(|| Box::new(StdinSource::default()));
        let output = options
            .output
            .unwrap_or_else(|| Box::new(io::stdout()) as Box<dyn Write + Send>);
        Session {
            started: false,
            paused: false,
            allow_empty: options.allow_empty,
            message_prefix: options.message_prefix,
            delimiter: options.delimiter,
            reader: Reader::new(input),
            output: Arc::new(Mutex::new(output)),
            history: History::new(options.memory_size),
            registry: Registry::new(),
            overrides: options.overrides,
            observers: Vec::new(),
            handle_interrupt: options.handle_interrupt,
        }
    }

    /// Session on process stdio with interrupt handling enabled.
    pub fn standard() -> Self {
        Session::new(Options::default().handle_interrupt(true))
    }

    /// Begin the session. Idempotent: a second call is a no-op and emits
    /// nothing, and the interrupt handler is registered at most once.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        if self.handle_interrupt {
            let sink = Arc::clone(&self.output);
            let _ = ctrlc::set_handler(move || {
                if let Ok(mut out) = sink.lock() {
                    let _ = writeln!(out);
                }
                process::exit(1);
            });
        }
        self.started = true;
        self.emit(Event::Start);
    }

    /// Stop delivering input. No-op when not started or already paused.
    pub fn pause(&mut self) {
        if !self.started || self.paused {
            return;
        }
        self.reader.pause();
        self.paused = true;
        self.emit(Event::Pause);
    }

    /// Resume input delivery. No-op when not started or not paused.
    pub fn resume(&mut self) {
        if !self.started || !self.paused {
            return;
        }
        self.reader.resume();
        self.paused = false;
        self.emit(Event::Resume);
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    /// Register a named property for bare-name schema lookups.
    pub fn define(&mut self, name: impl Into<String>, spec: LeafSpec) {
        self.registry.insert(name.into().to_lowercase(), spec);
    }

    /// Seed an override after construction.
    pub fn set_override(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(name.into(), value.into());
    }

    /// Subscribe to session events.
    pub fn observe(&mut self, observer: impl FnMut(&Event) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Answer history by recency index (0 = most recent) or property name.
    pub fn history(&self, key: impl Into<Lookup>) -> Option<&Entry> {
        self.history.lookup(key)
    }

    pub(crate) fn emit(&mut self, event: Event) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemorySource;
    use std::sync::{Arc, Mutex};

    fn session() -> (Session, Arc<Mutex<Vec<Event>>>) {
        let mut session = Session::new(
            Options::default()
                .input(MemorySource::new(Vec::new()))
                .output(Vec::new()),
        );
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.observe(move |event| sink.lock().unwrap().push(event.clone()));
        (session, events)
    }

    #[test]
    fn start_is_idempotent() {
        let (mut session, events) = session();
        session.start();
        session.start();
        assert!(session.started());
        assert_eq!(*events.lock().unwrap(), vec![Event::Start]);
    }

    #[test]
    fn pause_and_resume_guard_against_double_transitions() {
        let (mut session, events) = session();
        session.pause(); // not started yet: no-op
        session.start();
        session.pause();
        session.pause();
        session.resume();
        session.resume();
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Start, Event::Pause, Event::Resume]
        );
    }
}
