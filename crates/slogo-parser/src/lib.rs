//! SLogo tree builder: converts a classified command stream into a forest
//! of parameterized command trees.

mod builder;

pub use builder::{build, TreeBuilder, MAX_NESTING_DEPTH};
