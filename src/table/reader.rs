//! 上传表格解析: 将 CSV / xlsx 单元格映射为强类型行
//!
//! 格式按文件头判断 (xlsx 为 zip, 以 `PK\x03\x04` 开头), xlsx 只读第一张工作表。
//! 列按配置的表头名定位 (去空白、忽略大小写、去 UTF-8 BOM)。
//! 文章编号为空的行视为表格尾部空行直接跳过。

use crate::config::TableConfig;
use crate::error::TableError;
use crate::models::{SalesRecord, StockRecord};
use bigdecimal::{BigDecimal, Zero};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use std::str::FromStr;

/// 数量允许的最大十进制指数 (绝对值)
pub const MAX_QUANTITY_EXPONENT: i64 = 18;
/// 数量允许的最大有效位数
pub const MAX_QUANTITY_DIGITS: u64 = 30;

const XLSX_MAGIC: &[u8] = b"PK\x03\x04";

/// 上传文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(XLSX_MAGIC) {
            TableFormat::Xlsx
        } else {
            TableFormat::Csv
        }
    }
}

/// 未类型化的表格: 表头 + (行号, 单元格文本)
struct RawTable {
    headers: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl RawTable {
    fn load(data: &[u8], config: &TableConfig) -> Result<Self, TableError> {
        match TableFormat::detect(data) {
            TableFormat::Csv => Self::from_csv(data, config),
            TableFormat::Xlsx => Self::from_xlsx(data),
        }
    }

    fn from_csv(data: &[u8], config: &TableConfig) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(config.delimiter_byte())
            .from_reader(data);

        let headers = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            rows.push((line, record.iter().map(str::to_string).collect()));
        }

        Ok(Self { headers, rows })
    }

    fn from_xlsx(data: &[u8]) -> Result<Self, TableError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TableError::EmptyWorkbook)??;

        // 行号按工作表实际位置 (1 起)
        let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
        let mut sheet_rows = range.rows();
        let headers = sheet_rows
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let rows = sheet_rows
            .enumerate()
            .map(|(idx, row)| (first_line + idx + 1, row.iter().map(cell_text).collect()))
            .collect();

        Ok(Self { headers, rows })
    }

    fn locate_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase() == wanted)
    }

    fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.locate_column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// 读取库存表 (文章编号, 可选文章名, 库存); 编号或库存无效时报错
pub fn read_stock_table(data: &[u8], config: &TableConfig) -> Result<Vec<StockRecord>, TableError> {
    let table = RawTable::load(data, config)?;

    let id_col = table.require_column(&config.article_id_column)?;
    let stock_col = table.require_column(&config.stock_column)?;
    let name_col = table.locate_column(&config.article_name_column);

    let mut records = Vec::new();
    for (line, row) in &table.rows {
        let raw_id = cell(row, id_col);
        if raw_id.is_empty() {
            continue;
        }
        let article_id = parse_article_id(raw_id).ok_or_else(|| TableError::InvalidCell {
            line: *line,
            column: config.article_id_column.clone(),
            value: raw_id.to_string(),
        })?;

        let raw_stock = cell(row, stock_col);
        let stock_on_hand = parse_quantity(raw_stock).ok_or_else(|| TableError::InvalidCell {
            line: *line,
            column: config.stock_column.clone(),
            value: raw_stock.to_string(),
        })?;
        if stock_on_hand < BigDecimal::zero() {
            tracing::warn!("Article {} has negative stock {} (line {})", article_id, stock_on_hand, line);
        }

        records.push(StockRecord {
            article_id,
            article_name: name_col.and_then(|c| text_cell(row, c)),
            stock_on_hand,
        });
    }

    tracing::debug!("Parsed {} stock rows", records.len());
    Ok(records)
}

/// 读取销售/促销表
///
/// 历史数据容错: 编号不是整数的行 (如 "Summe" 合计行) 跳过,
/// 促销数量无法解析时记为缺失。
pub fn read_sales_table(data: &[u8], config: &TableConfig) -> Result<Vec<SalesRecord>, TableError> {
    let table = RawTable::load(data, config)?;

    let id_col = table.require_column(&config.article_id_column)?;
    let name_col = table.require_column(&config.article_name_column)?;
    let qty_col = table.require_column(&config.promo_quantity_column)?;

    let mut records = Vec::new();
    let mut missing_quantities = 0usize;
    let mut skipped_rows = 0usize;
    for (line, row) in &table.rows {
        let raw_id = cell(row, id_col);
        if raw_id.is_empty() {
            continue;
        }
        let Some(article_id) = parse_article_id(raw_id) else {
            tracing::warn!("Skipping sales row at line {}: article id '{}' is not an integer", line, raw_id);
            skipped_rows += 1;
            continue;
        };

        let promo_quantity = parse_quantity(cell(row, qty_col));
        if promo_quantity.is_none() {
            missing_quantities += 1;
        }

        records.push(SalesRecord {
            article_id,
            article_name: text_cell(row, name_col),
            promo_quantity,
        });
    }

    tracing::debug!(
        "Parsed {} sales rows ({} without numeric promo quantity, {} skipped)",
        records.len(),
        missing_quantities,
        skipped_rows
    );
    Ok(records)
}

/// 数量单元格 -> 数字
///
/// 空白、非数字、指数或位数超出范围 (如 "1e3000000") 均返回 None。
pub fn parse_quantity(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > 64 {
        return None;
    }
    let value = BigDecimal::from_str(trimmed).ok()?;
    let (_, exponent) = value.as_bigint_and_exponent();
    if exponent.abs() > MAX_QUANTITY_EXPONENT || value.digits() > MAX_QUANTITY_DIGITS {
        tracing::debug!("Quantity '{}' out of range, treated as missing", trimmed);
        return None;
    }
    Some(value)
}

/// 文章编号: 整数, 兼容表格导出的 "1001.0"
pub fn parse_article_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.trim()).unwrap_or("")
}

fn text_cell(row: &[String], col: usize) -> Option<String> {
    let value = cell(row, col);
    (!value.is_empty()).then(|| value.to_string())
}
