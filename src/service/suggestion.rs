use super::calculator::{distinct_article_ids, OrderSuggestionCalculator};
use crate::config::{CalculationConfig, TableConfig};
use crate::error::TableError;
use crate::models::{OrderSuggestion, UnknownNamePolicy};
use crate::table::{parse_quantity, read_sales_table, read_stock_table, SalesFilter};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 单次计算参数
#[derive(Debug, Clone)]
pub struct SuggestionParams {
    pub safety_factor: BigDecimal,
    pub policy: UnknownNamePolicy,
    pub filter: SalesFilter,
}

/// 单次计算结果 (含统计信息)
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub generated_at: DateTime<Utc>,
    pub safety_factor: BigDecimal,
    pub policy: UnknownNamePolicy,
    pub stock_rows: usize,
    pub sales_rows: usize,
    pub sales_rows_used: usize,
    pub suggestions: Vec<OrderSuggestion>,
}

impl SuggestionReport {
    /// 建议订货量 > 0 的文章数
    pub fn articles_to_order(&self) -> usize {
        self.suggestions
            .iter()
            .filter(|s| s.suggested_order_quantity > BigDecimal::zero())
            .count()
    }
}

/// 订货建议服务: 解析两张上传表格 -> 筛选 -> 计算
pub struct SuggestionService {
    table: TableConfig,
    calculation: CalculationConfig,
}

impl SuggestionService {
    pub fn new(table: TableConfig, calculation: CalculationConfig) -> Self {
        Self { table, calculation }
    }

    /// 请求未指定参数时使用的默认值
    pub fn default_params(&self) -> SuggestionParams {
        SuggestionParams {
            safety_factor: safety_factor_from_f64(self.calculation.default_safety_factor),
            policy: self.calculation.unknown_name_policy,
            filter: SalesFilter::default(),
        }
    }

    pub fn suggest(
        &self,
        stock_data: &[u8],
        sales_data: &[u8],
        params: &SuggestionParams,
    ) -> Result<SuggestionReport, TableError> {
        // 1. 解析上传表格
        let stock = read_stock_table(stock_data, &self.table)?;
        let sales = read_sales_table(sales_data, &self.table)?;
        let sales_rows = sales.len();

        // 2. 可选筛选 (仅作用于销售表)
        let sales = params.filter.apply(sales);

        // 3. 文章编号取自库存表 (保序去重)
        let article_ids: Vec<i64> = distinct_article_ids(&stock).into_iter().collect();

        tracing::info!(
            "开始计算订货建议: {} 条库存, {} 条销售 (筛选后 {}), {} 个文章编号, 安全系数 {}",
            stock.len(), sales_rows, sales.len(), article_ids.len(), params.safety_factor
        );

        // 4. 核心计算
        let calculator = OrderSuggestionCalculator::new(params.policy);
        let suggestions = calculator.compute(&stock, &sales, &article_ids, &params.safety_factor);

        let report = SuggestionReport {
            generated_at: Utc::now(),
            safety_factor: params.safety_factor.clone(),
            policy: params.policy,
            stock_rows: stock.len(),
            sales_rows,
            sales_rows_used: sales.len(),
            suggestions,
        };

        tracing::info!(
            "计算完成: {} 条建议, 其中 {} 个文章需要订货",
            report.suggestions.len(),
            report.articles_to_order()
        );

        Ok(report)
    }
}

/// f64 -> BigDecimal, 经十进制字符串转换 (0.1 保持为 0.1); 非有限值或超出范围时为 0
pub fn safety_factor_from_f64(value: f64) -> BigDecimal {
    parse_quantity(&value.to_string()).unwrap_or_else(|| {
        tracing::warn!("Safety factor {} is out of range, using 0", value);
        BigDecimal::zero()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const STOCK: &str = "\
Artikelnummer,Bestand Vortag in Stück (ST)
1,5
2,10
1,99
3,0
";

    const SALES: &str = "\
Artikelnummer,Artikelname,Menge Aktion
1,Widget,12
1,Widget,8
2,Gadget,n/a
2,Gadget,20
4,Orphan,50
";

    fn service() -> SuggestionService {
        SuggestionService::new(TableConfig::default(), CalculationConfig::default())
    }

    #[test]
    fn default_params_come_from_config() {
        let params = service().default_params();
        assert_eq!(params.safety_factor, BigDecimal::from_str("0.1").unwrap());
        assert_eq!(params.policy, UnknownNamePolicy::Skip);
        assert!(params.filter.is_empty());
    }

    #[test]
    fn end_to_end_with_default_params() {
        let svc = service();
        let report = svc
            .suggest(STOCK.as_bytes(), SALES.as_bytes(), &svc.default_params())
            .unwrap();

        assert_eq!(report.stock_rows, 4);
        assert_eq!(report.sales_rows, 5);
        // 3 没有销售行 (Skip 策略), 4 不在库存表
        let ids: Vec<i64> = report.suggestions.iter().map(|s| s.article_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            report.suggestions[0].suggested_order_quantity,
            BigDecimal::from_str("8.2").unwrap()
        );
        assert_eq!(
            report.suggestions[1].suggested_order_quantity,
            BigDecimal::from(12)
        );
        assert_eq!(report.articles_to_order(), 2);
    }

    #[test]
    fn filtered_out_article_behaves_as_without_sales() {
        let svc = service();
        let params = SuggestionParams {
            safety_factor: BigDecimal::zero(),
            policy: UnknownNamePolicy::LabelUnknown,
            filter: SalesFilter::new(None, Some("wid".to_string())),
        };
        let report = svc.suggest(STOCK.as_bytes(), SALES.as_bytes(), &params).unwrap();

        assert_eq!(report.sales_rows_used, 2);
        let gadget = report.suggestions.iter().find(|s| s.article_id == 2).unwrap();
        assert_eq!(gadget.article_name, "Unbekannt");
        assert_eq!(gadget.peak_consumption, BigDecimal::zero());
        assert_eq!(gadget.suggested_order_quantity, BigDecimal::zero());
    }

    #[test]
    fn parse_errors_propagate() {
        let svc = service();
        let err = svc
            .suggest(b"foo,bar\n1,2\n", SALES.as_bytes(), &svc.default_params())
            .unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(_)));
    }

    #[test]
    fn safety_factor_conversion_is_exact() {
        assert_eq!(safety_factor_from_f64(0.1), BigDecimal::from_str("0.1").unwrap());
        assert_eq!(safety_factor_from_f64(f64::NAN), BigDecimal::zero());
        assert_eq!(safety_factor_from_f64(1e-300), BigDecimal::zero());
    }
}
