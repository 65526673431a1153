// ==========================================
// 备件库存规划 - Excel 写出
// ==========================================
// 工具: rust_xlsxwriter（写入内存缓冲区）
// 格式: 首行为加粗表头，数字写为数值单元格，空值留空
// ==========================================

use crate::domain::{CellValue, OutputSheet, ReportTable};
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::sheet_name::SheetNameAllocator;
use crate::exporter::sheet_sink_trait::{SheetSink, SheetWriteFailure, SinkOutput};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSheetSink;

impl XlsxSheetSink {
    pub fn new() -> Self {
        Self
    }
}

impl SheetSink for XlsxSheetSink {
    fn write_sheets(&self, sheets: &[OutputSheet]) -> ExportResult<SinkOutput> {
        if sheets.is_empty() {
            return Err(ExportError::NoSheets);
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let mut names = SheetNameAllocator::new();
        let mut failures = Vec::new();

        for (index, sheet) in sheets.iter().enumerate() {
            let name = names.allocate(&sheet.name);
            if name != sheet.name {
                debug!(original = %sheet.name, renamed = %name, "sheet 名已调整");
            }

            // 每个 sheet 独立渲染，失败时整张替换为错误表
            let worksheet = match render_worksheet(&name, &sheet.table, &header_format) {
                Ok(worksheet) => worksheet,
                Err(err) => {
                    let message = err.to_string();
                    warn!(sheet = %sheet.name, error = %message, "sheet 写出失败，改写错误表");
                    let error_table = ReportTable::error(&sheet.name, &message);
                    failures.push(SheetWriteFailure {
                        index,
                        sheet: sheet.name.clone(),
                        error: message,
                    });
                    render_worksheet(&name, &error_table, &header_format)?
                }
            };
            workbook.push_worksheet(worksheet);
        }

        Ok(SinkOutput {
            bytes: workbook.save_to_buffer()?,
            failures,
        })
    }
}

fn render_worksheet(
    name: &str,
    table: &ReportTable,
    header_format: &Format,
) -> ExportResult<Worksheet> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;

    for (col, column) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column, header_format)?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            write_cell(&mut worksheet, row_num, col as u16, value)?;
        }
    }
    Ok(worksheet)
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> ExportResult<()> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(s) => {
            ws.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            ws.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}
