pub mod config;
pub mod error;

pub use config::EncybaraConfig;
pub use error::{CoreError, Result};
