pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod table;

pub use config::AppConfig;
pub use error::TableError;
pub use service::{OrderSuggestionCalculator, SuggestionService};
