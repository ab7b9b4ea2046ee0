pub mod error;
pub mod health;
pub mod inventory;

pub use error::AppError;
