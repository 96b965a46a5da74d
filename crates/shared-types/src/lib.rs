pub mod blood;
pub mod config;
pub mod error;
pub mod models;
pub mod requests;
pub mod stats;

pub use blood::*;
pub use config::*;
pub use error::*;
pub use models::*;
pub use requests::*;
pub use stats::*;
