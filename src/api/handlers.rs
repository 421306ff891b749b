use super::error::{ApiError, ApiResult};
use crate::models::{OrderSuggestion, UnknownNamePolicy};
use crate::error::TableError;
use crate::service::{SuggestionParams, SuggestionReport, SuggestionService};
use crate::table::{parse_quantity, suggestions_to_csv_bytes, suggestions_to_xlsx_bytes, SalesFilter};
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// 下载文件名
pub const EXPORT_FILE_NAME: &str = "bestellvorschlag.csv";
pub const EXPORT_XLSX_FILE_NAME: &str = "bestellvorschlag.xlsx";

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 响应体
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub success: bool,
    pub message: String,
    pub generated_at: DateTime<Utc>,
    pub safety_factor: BigDecimal,
    pub suggestions: Vec<OrderSuggestion>,
}

/// 上传内容: 两张表 + 参数
struct SuggestionUpload {
    stock: Vec<u8>,
    sales: Vec<u8>,
    params: SuggestionParams,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 计算订货建议 (JSON)
pub async fn create_suggestions(
    State(service): State<Arc<SuggestionService>>,
    multipart: Multipart,
) -> ApiResult<Json<SuggestionResponse>> {
    let upload = read_upload(&service, multipart).await?;
    let report = run_suggest(service, upload).await?;

    Ok(Json(SuggestionResponse {
        success: true,
        message: format!(
            "Calculated {} suggestions, {} articles to order",
            report.suggestions.len(),
            report.articles_to_order()
        ),
        generated_at: report.generated_at,
        safety_factor: report.safety_factor,
        suggestions: report.suggestions,
    }))
}

/// 计算并下载 CSV
pub async fn export_suggestions(
    State(service): State<Arc<SuggestionService>>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_upload(&service, multipart).await?;
    let body = run_blocking(move || {
        let report = service.suggest(&upload.stock, &upload.sales, &upload.params)?;
        suggestions_to_csv_bytes(&report.suggestions)
    })
    .await?;

    Ok(attachment(CSV_CONTENT_TYPE, EXPORT_FILE_NAME, body))
}

/// 计算并下载 xlsx (单张工作表)
pub async fn export_suggestions_xlsx(
    State(service): State<Arc<SuggestionService>>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_upload(&service, multipart).await?;
    let body = run_blocking(move || {
        let report = service.suggest(&upload.stock, &upload.sales, &upload.params)?;
        suggestions_to_xlsx_bytes(&report.suggestions)
    })
    .await?;

    Ok(attachment(XLSX_CONTENT_TYPE, EXPORT_XLSX_FILE_NAME, body))
}

async fn run_suggest(service: Arc<SuggestionService>, upload: SuggestionUpload) -> ApiResult<SuggestionReport> {
    run_blocking(move || service.suggest(&upload.stock, &upload.sales, &upload.params)).await
}

/// 解析与计算为同步 CPU 工作, 放到阻塞线程池执行
async fn run_blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, TableError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Calculation task failed: {}", e)))?
        .map_err(ApiError::from)
}

fn attachment(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// 读取 multipart 字段: stock / sales 文件必填, 其余可选
async fn read_upload(service: &SuggestionService, mut multipart: Multipart) -> ApiResult<SuggestionUpload> {
    let mut stock = None;
    let mut sales = None;
    let mut params = service.default_params();
    let mut article_filter = None;
    let mut name_filter = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "stock" => stock = Some(field.bytes().await?.to_vec()),
            "sales" => sales = Some(field.bytes().await?.to_vec()),
            "safety_factor" => params.safety_factor = parse_safety_factor(&field.text().await?)?,
            "unknown_name_policy" => {
                params.policy = UnknownNamePolicy::from_str(&field.text().await?)
                    .map_err(ApiError::BadRequest)?;
            }
            "article_filter" => article_filter = Some(field.text().await?),
            "name_filter" => name_filter = Some(field.text().await?),
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    params.filter = SalesFilter::new(article_filter, name_filter);

    let stock = stock.ok_or_else(|| ApiError::BadRequest("Missing stock file in multipart request".to_string()))?;
    let sales = sales.ok_or_else(|| ApiError::BadRequest("Missing sales file in multipart request".to_string()))?;

    Ok(SuggestionUpload { stock, sales, params })
}

/// 安全系数必须在 [0, 1] 之间, 指数范围与表格数量相同
fn parse_safety_factor(raw: &str) -> ApiResult<BigDecimal> {
    let value = parse_quantity(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid safety factor '{}'", raw.trim())))?;
    if value < BigDecimal::from(0) || value > BigDecimal::from(1) {
        return Err(ApiError::BadRequest(format!(
            "Safety factor {} must be between 0 and 1",
            value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_factor_bounds() {
        assert_eq!(parse_safety_factor(" 0.25 ").unwrap(), BigDecimal::from_str("0.25").unwrap());
        assert_eq!(parse_safety_factor("1").unwrap(), BigDecimal::from(1));
        assert!(parse_safety_factor("1.05").is_err());
        assert!(parse_safety_factor("-0.1").is_err());
        assert!(parse_safety_factor("zehn").is_err());
        assert!(parse_safety_factor("1e-3000000").is_err());
    }
}
