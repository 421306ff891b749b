pub mod policy;
pub mod sales;
pub mod stock;
pub mod suggestion;

pub use policy::{UnknownNamePolicy, UNKNOWN_ARTICLE_NAME};
pub use sales::SalesRecord;
pub use stock::StockRecord;
pub use suggestion::OrderSuggestion;
