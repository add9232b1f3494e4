//! Data models shared across the workspace.

mod media;
mod resize;
mod upload;
mod user;

pub use media::*;
pub use resize::*;
pub use upload::*;
pub use user::*;
