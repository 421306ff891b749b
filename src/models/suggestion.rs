use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 订货建议 (结果表一行)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSuggestion {
    pub article_id: i64,
    pub article_name: String,
    pub peak_consumption: BigDecimal,          // 历史最大促销销量
    pub current_stock: BigDecimal,
    pub suggested_order_quantity: BigDecimal,  // 恒 >= 0
}
