use thiserror::Error;

/// 上传表格解析/导出错误 (面向用户的提示)
#[derive(Error, Debug)]
pub enum TableError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("invalid value '{value}' in column '{column}' at line {line}")]
    InvalidCell {
        line: usize,
        column: String,
        value: String,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Excel error: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("Excel file contains no worksheet")]
    EmptyWorkbook,
    #[error("Excel export failed: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
