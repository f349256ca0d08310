//! volplan library - disk image layout planning

pub mod config;
pub mod disk;
pub mod render;
pub mod utils;

pub use config::PlanRequest;
pub use utils::error::VolplanError;
