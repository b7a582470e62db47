pub mod assemble;
pub mod history;
pub mod normalize;
pub mod schema;
pub mod validate;

pub use assemble::{Assembler, merge, put};
pub use history::{Entry, History, Lookup};
pub use normalize::{Registry, normalize};
pub use schema::{Leaf, LeafSpec, Predicate, Source};
pub use validate::{Outcome, SchemaError, check, resolve};
