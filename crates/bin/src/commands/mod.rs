pub mod edit;
pub mod serve;
pub mod tree;
