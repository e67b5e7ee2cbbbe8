mod history;
mod operations;

pub use history::*;
pub use operations::*;
