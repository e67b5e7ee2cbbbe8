mod cursor;
#[allow(clippy::module_inception)]
mod selection;

pub use cursor::*;
pub use selection::*;
