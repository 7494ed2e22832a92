//! docrelay
//!
//! Ingests remotely hosted PDF documents: records their provenance in
//! Postgres, stages them on local disk and relays them to S3, answering with
//! a temporary local link and a persistent object-store link.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
