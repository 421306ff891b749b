pub mod export;
pub mod filter;
pub mod reader;

pub use export::{
    suggestions_to_csv_bytes, suggestions_to_xlsx_bytes, write_suggestions_csv, SUGGESTION_COLUMNS,
    SUGGESTION_SHEET_NAME,
};
pub use filter::SalesFilter;
pub use reader::{parse_article_id, parse_quantity, read_sales_table, read_stock_table, TableFormat};
