mod color;
mod coordinate;
mod event;
mod galaxy;
mod government;
mod map;
mod planet;
mod sprite;
mod stellar_object;
mod system;
mod text;
mod trade;
mod wormhole;

pub use color::*;
pub use coordinate::*;
pub use event::*;
pub use galaxy::*;
pub use government::*;
pub use map::*;
pub use planet::*;
pub use sprite::*;
pub use stellar_object::*;
pub use system::*;
pub use text::*;
pub use trade::*;
pub use wormhole::*;
