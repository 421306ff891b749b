use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 库存表行 (每个文章编号一行, 以 article_id 为查找键)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub article_id: i64,
    pub article_name: Option<String>,
    pub stock_on_hand: BigDecimal, // 前一日库存 (件)
}

impl StockRecord {
    pub fn new(article_id: i64, stock_on_hand: BigDecimal) -> Self {
        Self {
            article_id,
            article_name: None,
            stock_on_hand,
        }
    }
}
