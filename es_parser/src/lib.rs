mod errors;
mod node;
mod tokenizer;
mod tree;

pub use errors::*;
pub use node::*;
pub use tokenizer::*;
pub use tree::*;
