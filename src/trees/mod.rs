pub mod builder;
pub mod classifier;
pub mod node;
pub mod persist;
pub mod split;
