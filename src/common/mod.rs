mod fs;
mod polygon;

pub use fs::*;
pub(crate) use polygon::*;
