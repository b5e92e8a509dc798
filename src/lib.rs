pub mod bytes;

pub mod ctrl_surf;
pub use ctrl_surf::InputElement;

pub mod midi;
