#[macro_use]
mod fields;

pub mod builder;
pub mod game_data;
pub mod merge;
pub mod model;
pub mod overrides;
pub mod resolver;
pub mod values;

pub use builder::*;
pub use fields::*;
pub use game_data::*;
pub use merge::*;
pub use model::*;
pub use overrides::*;
