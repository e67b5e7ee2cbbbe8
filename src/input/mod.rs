mod event;
mod router;

pub use event::*;
pub use router::*;
