pub mod camera;
pub mod frame;
