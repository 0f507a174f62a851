//! Model artifact location and execution device.

pub mod device;
pub mod source;

pub use device::Device;
pub use source::ModelSource;
