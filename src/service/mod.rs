pub mod calculator;
pub mod suggestion;

pub use calculator::{distinct_article_ids, peak_consumption, OrderSuggestionCalculator};
pub use suggestion::{safety_factor_from_f64, SuggestionParams, SuggestionReport, SuggestionService};
