use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 销售/促销历史行, 同一文章编号可出现多次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub article_id: i64,
    pub article_name: Option<String>,
    /// 无法解析为数字的单元格记为 None, 不参与最大值计算
    pub promo_quantity: Option<BigDecimal>,
}

impl SalesRecord {
    pub fn new(article_id: i64, article_name: &str, promo_quantity: Option<BigDecimal>) -> Self {
        Self {
            article_id,
            article_name: Some(article_name.to_string()),
            promo_quantity,
        }
    }
}
