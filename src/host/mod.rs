mod components;
mod projection;
mod services;
mod world;

pub use components::*;
pub use projection::*;
pub use services::*;
pub use world::*;
