#[allow(clippy::module_inception)]
mod catalog;
mod library;
mod template;

pub use catalog::*;
pub use library::*;
pub use template::*;
