pub mod leaf;
pub mod source;

pub use leaf::{Leaf, LeafSpec, Predicate};
pub use source::Source;
