//! Schema-driven interactive prompting for the terminal.
//!
//! A [`Session`] turns a property schema (a bare name, a flat name→spec
//! map, or a nested `properties` tree) into an ordered sequence of terminal
//! questions with validation, defaults, masked input, and answer history,
//! then reassembles the answers into one nested JSON object.
//!
//! ```no_run
//! use beseech::Session;
//! use serde_json::json;
//!
//! fn main() -> Result<(), beseech::Error> {
//!     let schema = json!({
//!         "properties": {
//!             "url": { "required": true },
//!             "auth": {
//!                 "properties": {
//!                     "username": { "required": true },
//!                     "password": { "required": true, "hidden": true }
//!                 }
//!             }
//!         }
//!     });
//!
//!     let mut session = Session::standard();
//!     session.start();
//!     let result = session.get(schema)?;
//!     println!("{}", result["auth"]["username"]);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod reader;
pub mod sequencer;
pub mod session;

pub use beseech_spec as spec;
pub use beseech_spec::{Entry, History, Leaf, LeafSpec, Lookup, Predicate, Source};

pub use error::Error;
pub use reader::{InputSource, MemorySource, Reader, StdinSource};
pub use sequencer::Confirmation;
pub use session::{Event, Options, Session};
