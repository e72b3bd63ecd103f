pub mod export;
pub mod node;
pub mod tree;
