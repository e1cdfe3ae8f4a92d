#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Data types shared between the store, the views and the HTTP API.

mod avatar;
pub use avatar::*;

mod map;
pub use map::*;

mod profile;
pub use profile::*;

mod render;
pub use render::*;
