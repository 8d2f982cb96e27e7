pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{LensError, LensResult};
pub use types::{Analytics, UserProfile, UserRole};
