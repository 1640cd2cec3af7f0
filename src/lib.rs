pub mod adjacency;
pub mod config;
pub mod error;
pub mod math;
pub mod operations;
pub mod session;
pub mod topology;

#[cfg(test)]
mod test_meshes;

pub use config::{DetectOptions, Limits};
pub use error::{Result, SolidHolesError};
pub use session::HoleDetection;
