use crate::models::{OrderSuggestion, SalesRecord, StockRecord, UnknownNamePolicy, UNKNOWN_ARTICLE_NAME};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;

/// 订货建议计算 (纯函数, 无副作用)
///
/// 对每个文章编号:
/// 建议订货量 = max(历史最大促销销量 * (1 + 安全系数) - 当前库存, 0)
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderSuggestionCalculator {
    policy: UnknownNamePolicy,
}

impl OrderSuggestionCalculator {
    pub fn new(policy: UnknownNamePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownNamePolicy {
        self.policy
    }

    /// 按 article_ids 顺序计算; 库存表中不存在的编号直接跳过。
    /// 安全系数不做校验或截断。
    pub fn compute(
        &self,
        stock: &[StockRecord],
        sales: &[SalesRecord],
        article_ids: &[i64],
        safety_factor: &BigDecimal,
    ) -> Vec<OrderSuggestion> {
        let markup = BigDecimal::from(1) + safety_factor;
        let mut suggestions = Vec::with_capacity(article_ids.len());

        for &article_id in article_ids {
            // 1. 库存查找 (取第一条匹配)
            let Some(stock_row) = stock.iter().find(|s| s.article_id == article_id) else {
                continue;
            };

            // 2. 历史最大促销销量
            let peak = peak_consumption(article_id, sales);

            // 3. 文章名取第一条匹配的销售行
            let Some(article_name) = self.resolve_name(article_id, sales) else {
                tracing::debug!("Article {} has no resolvable name, skipping", article_id);
                continue;
            };

            // 4. 安全系数加成后扣减库存, 下限为 0
            let raw = &peak * &markup - &stock_row.stock_on_hand;
            let suggested = if raw > BigDecimal::zero() { raw } else { BigDecimal::zero() };

            suggestions.push(OrderSuggestion {
                article_id,
                article_name,
                peak_consumption: peak,
                current_stock: stock_row.stock_on_hand.clone(),
                suggested_order_quantity: suggested,
            });
        }

        suggestions
    }

    fn resolve_name(&self, article_id: i64, sales: &[SalesRecord]) -> Option<String> {
        let first = sales.iter().find(|r| r.article_id == article_id);
        let name = first
            .and_then(|r| r.article_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != UNKNOWN_ARTICLE_NAME);

        match (name, self.policy) {
            (Some(n), _) => Some(n.to_string()),
            (None, UnknownNamePolicy::Skip) => None,
            (None, UnknownNamePolicy::LabelUnknown) => Some(UNKNOWN_ARTICLE_NAME.to_string()),
        }
    }
}

/// 最大促销销量; 缺失值不参与比较, 无有效值时为 0
pub fn peak_consumption(article_id: i64, sales: &[SalesRecord]) -> BigDecimal {
    sales
        .iter()
        .filter(|r| r.article_id == article_id)
        .filter_map(|r| r.promo_quantity.as_ref())
        .max()
        .cloned()
        .unwrap_or_else(BigDecimal::zero)
}

/// 库存表中的文章编号, 按首次出现顺序去重
pub fn distinct_article_ids(stock: &[StockRecord]) -> IndexSet<i64> {
    stock.iter().map(|s| s.article_id).collect()
}
