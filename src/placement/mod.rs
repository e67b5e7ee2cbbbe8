mod commit;
mod placer;
mod settings;
mod state;
mod transform;

pub use commit::*;
pub use placer::*;
pub use settings::*;
pub use state::*;
pub use transform::*;
