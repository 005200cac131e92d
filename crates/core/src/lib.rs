pub mod config;
pub mod error;
pub mod series;

pub use config::Config;
pub use error::*;
pub use series::*;
