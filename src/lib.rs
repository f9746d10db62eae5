pub mod config;
pub mod error;
pub mod loader;

pub use config::*;
pub use error::*;
pub use loader::*;

pub use es_model;
pub use es_parser;
