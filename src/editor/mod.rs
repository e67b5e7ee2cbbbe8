mod camera;
mod plugin;
mod requests;
mod scene;
mod view;

pub use camera::PlacerCamera;
pub use plugin::*;
pub use requests::*;
pub use scene::*;
pub use view::*;
