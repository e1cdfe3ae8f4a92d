pub mod admin;
pub mod directory;
pub mod map;

pub use admin::*;
pub use directory::*;
pub use map::*;
