pub mod comments;
pub mod counts;
pub mod degraded;
pub mod error;
pub mod health;

pub use error::AppError;
