//! Frame loop plumbing: timing and the update/render driver

mod driver;
mod time;

pub use driver::FrameDriver;
pub use time::Time;
