// ==========================================
// 备件库存规划 - 工作簿解析器实现
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 约定: 每个 sheet 首行为表头，完全空白的数据行直接跳过
// ==========================================

use crate::domain::{CellValue, SheetTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_source_trait::{LoadedSheet, SheetSource};
use calamine::{Data, Range, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// Excel 数据源
// ==========================================
pub struct XlsxSheetSource {
    bytes: Vec<u8>,
}

impl XlsxSheetSource {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_path(path: &Path) -> ImportResult<Self> {
        check_file(path, &["xlsx", "xlsm"])?;
        Ok(Self::from_bytes(std::fs::read(path)?))
    }
}

impl SheetSource for XlsxSheetSource {
    fn read_sheets(&self) -> ImportResult<Vec<LoadedSheet>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(self.bytes.as_slice()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::EmptyWorkbook);
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let content = match workbook.worksheet_range(&name) {
                Ok(range) => Ok(range_to_table(&name, &range)),
                Err(e) => {
                    warn!(sheet = %name, error = %e, "sheet 读取失败");
                    Err(ImportError::SheetReadError {
                        sheet: name.clone(),
                        message: e.to_string(),
                    })
                }
            };
            sheets.push(LoadedSheet { name, content });
        }

        Ok(sheets)
    }
}

/// calamine Range → SheetTable
fn range_to_table(name: &str, range: &Range<Data>) -> SheetTable {
    let mut rows = range.rows();

    // 提取表头（第一行）
    let headers: Vec<Option<String>> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_from_data).collect(),
        None => Vec::new(),
    };

    let mut table = SheetTable::new(name, headers);
    for data_row in rows {
        let row: Vec<CellValue> = data_row.iter().map(cell_from_data).collect();

        // 跳过完全空白的行
        if row.iter().all(CellValue::is_blank) {
            continue;
        }
        table.rows.push(row);
    }

    debug!(sheet = %name, rows = table.rows.len(), "sheet 解析完成");
    table
}

/// 仅文本表头参与列匹配
fn header_from_data(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// CSV 数据源（单 sheet，sheet 名取文件名）
// ==========================================
pub struct CsvSheetSource {
    sheet_name: String,
    bytes: Vec<u8>,
}

impl CsvSheetSource {
    pub fn from_bytes(sheet_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> ImportResult<Self> {
        check_file(path, &["csv"])?;
        let sheet_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();
        Ok(Self::from_bytes(sheet_name, std::fs::read(path)?))
    }
}

impl SheetSource for CsvSheetSource {
    fn read_sheets(&self) -> ImportResult<Vec<LoadedSheet>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(self.bytes.as_slice());

        // 读取表头
        let headers: Vec<Option<String>> = reader
            .headers()?
            .iter()
            .map(|h| {
                if h.trim().is_empty() {
                    None
                } else {
                    Some(h.to_string())
                }
            })
            .collect();

        let mut table = SheetTable::new(self.sheet_name.clone(), headers);
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_blank) {
                continue;
            }
            table.rows.push(row);
        }

        Ok(vec![LoadedSheet::ok(table)])
    }
}

// ==========================================
// 通用数据源（根据扩展名自动选择）
// ==========================================
pub struct UniversalSheetSource;

impl UniversalSheetSource {
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Box<dyn SheetSource>> {
        let path = file_path.as_ref();
        let ext = extension_of(path);

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvSheetSource::from_path(path)?)),
            "xlsx" | "xlsm" => Ok(Box::new(XlsxSheetSource::from_path(path)?)),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 检查文件存在及扩展名
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = extension_of(path);
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}
