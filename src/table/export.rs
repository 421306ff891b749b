use crate::error::TableError;
use crate::models::OrderSuggestion;
use bigdecimal::BigDecimal;
use rust_xlsxwriter::Workbook;
use std::io::Write;

/// xlsx 工作表名
pub const SUGGESTION_SHEET_NAME: &str = "Bestellvorschlag";

/// 结果表固定列 (顺序不可变)
pub const SUGGESTION_COLUMNS: [&str; 5] = [
    "Artikelnummer",
    "Artikelname",
    "Gesamtverbrauch",
    "Aktueller Bestand",
    "Bestellvorschlag",
];

/// 导出订货建议: 一行表头, 无索引列
pub fn write_suggestions_csv<W: Write>(
    suggestions: &[OrderSuggestion],
    output: W,
) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(SUGGESTION_COLUMNS)?;

    for s in suggestions {
        writer.write_record(&[
            s.article_id.to_string(),
            s.article_name.clone(),
            s.peak_consumption.to_string(),
            s.current_stock.to_string(),
            s.suggested_order_quantity.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出到内存 (下载用)
pub fn suggestions_to_csv_bytes(suggestions: &[OrderSuggestion]) -> Result<Vec<u8>, TableError> {
    let mut buffer = Vec::new();
    write_suggestions_csv(suggestions, &mut buffer)?;
    Ok(buffer)
}

/// 导出为 xlsx: 单张工作表, 一行表头, 无索引列; 数量写为数字单元格
pub fn suggestions_to_xlsx_bytes(suggestions: &[OrderSuggestion]) -> Result<Vec<u8>, TableError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUGGESTION_SHEET_NAME)?;

    for (col, name) in SUGGESTION_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for (idx, s) in suggestions.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, s.article_id as f64)?;
        sheet.write_string(row, 1, s.article_name.as_str())?;
        sheet.write_number(row, 2, as_f64(&s.peak_consumption))?;
        sheet.write_number(row, 3, as_f64(&s.current_stock))?;
        sheet.write_number(row, 4, as_f64(&s.suggested_order_quantity))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// 经十进制字符串转换, 8.2 得到最接近的 f64 (ToPrimitive 按 10 的幂相乘会产生误差)
fn as_f64(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;
    use std::str::FromStr;

    #[test]
    fn writes_header_and_rows_in_fixed_order() {
        let rows = vec![OrderSuggestion {
            article_id: 1,
            article_name: "Widget, groß".to_string(),
            peak_consumption: BigDecimal::from(12),
            current_stock: BigDecimal::from(5),
            suggested_order_quantity: BigDecimal::from_str("8.2").unwrap(),
        }];

        let bytes = suggestions_to_csv_bytes(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Artikelnummer,Artikelname,Gesamtverbrauch,Aktueller Bestand,Bestellvorschlag")
        );
        assert_eq!(lines.next(), Some("1,\"Widget, groß\",12,5,8.2"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_result_still_has_header() {
        let bytes = suggestions_to_csv_bytes(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().lines().count(), 1);
    }

    #[test]
    fn xlsx_export_has_single_sheet_with_header() {
        let rows = vec![OrderSuggestion {
            article_id: 1,
            article_name: "Widget".to_string(),
            peak_consumption: BigDecimal::from(12),
            current_stock: BigDecimal::from(5),
            suggested_order_quantity: BigDecimal::from_str("8.2").unwrap(),
        }];

        let bytes = suggestions_to_xlsx_bytes(&rows).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SUGGESTION_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let all: Vec<&[Data]> = range.rows().collect();
        assert_eq!(all.len(), 2);

        let header: Vec<String> = all[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(header, SUGGESTION_COLUMNS.to_vec());

        assert_eq!(all[1][0], Data::Float(1.0));
        assert_eq!(all[1][1], Data::String("Widget".to_string()));
        assert_eq!(all[1][2], Data::Float(12.0));
        assert_eq!(all[1][3], Data::Float(5.0));
        assert_eq!(all[1][4], Data::Float(8.2));
    }
}
