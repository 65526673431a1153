// ==========================================
// 备件库存规划 - 转换 API
// ==========================================
// 职责: 一次完整转换（工作簿字节 → 工作簿字节）
// 流程:
// 1. 读取配置（一次）
// 2. 拉取设备台账并构建索引（一次）
// 3. 逐 sheet 编排（失败隔离）
// 4. 写出输出工作簿
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{PlannerConfig, PlannerConfigReader};
use crate::domain::{ReferenceRecord, ReportTable};
use crate::engine::{SheetOrchestrator, SheetOutcome, WorkbookReport};
use crate::exporter::{SheetSink, XlsxSheetSink};
use crate::importer::{SheetSource, UniversalSheetSource, XlsxSheetSource};
use crate::reference::{ReferenceIndex, ReferenceLookup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// ConversionSummary - 转换摘要
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    /// 转换ID
    pub conversion_id: String,
    /// 开始/结束时间
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 生效配置
    pub config: PlannerConfig,
    /// 台账中有效序列号数
    pub reference_count: usize,
    /// 逐 sheet 结果（与输出 sheet 顺序一致）
    pub sheets: Vec<SheetOutcome>,
}

impl ConversionSummary {
    pub fn failed_sheet_count(&self) -> usize {
        self.sheets.iter().filter(|s| s.is_failed()).count()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// 转换响应
#[derive(Debug, Clone)]
pub struct ConversionResponse {
    pub bytes: Vec<u8>,
    pub summary: ConversionSummary,
}

/// 简要统计（供 CLI 输出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionTotals {
    pub sheets: usize,
    pub failed_sheets: usize,
    pub parts: usize,
}

impl From<&ConversionSummary> for ConversionTotals {
    fn from(summary: &ConversionSummary) -> Self {
        let parts = summary
            .sheets
            .iter()
            .map(|s| match s {
                SheetOutcome::Processed { parts, .. } => *parts,
                SheetOutcome::Failed { .. } => 0,
            })
            .sum();
        Self {
            sheets: summary.sheets.len(),
            failed_sheets: summary.failed_sheet_count(),
            parts,
        }
    }
}

// ==========================================
// 同步入口（纯内存）
// ==========================================

/// 处理工作簿字节
///
/// # 参数
/// - raw: 输入 xlsx 字节
/// - records: 设备台账记录
/// - config: 规划配置
///
/// # 返回
/// - Ok((输出 xlsx 字节, 处理结果))
/// - Err: 输入无法解析为工作簿 / 工作簿为空 / 工作簿整体无法生成
pub fn process_workbook(
    raw: &[u8],
    records: Vec<ReferenceRecord>,
    config: &PlannerConfig,
) -> ApiResult<(Vec<u8>, WorkbookReport)> {
    let source = XlsxSheetSource::from_bytes(raw.to_vec());
    let reference = ReferenceIndex::build(records);
    run(&source, &reference, config)
}

fn run(
    source: &dyn SheetSource,
    reference: &ReferenceIndex,
    config: &PlannerConfig,
) -> ApiResult<(Vec<u8>, WorkbookReport)> {
    let sheets = source.read_sheets()?;
    let mut report = SheetOrchestrator::new(config).process_workbook(sheets, reference);
    let output = XlsxSheetSink::new().write_sheets(&report.sheets)?;

    // 写出阶段失败的 sheet 同样只降级该 sheet
    for failure in output.failures {
        if let Some(outcome) = report.outcomes.get_mut(failure.index) {
            *outcome = SheetOutcome::Failed {
                sheet: failure.sheet.clone(),
                error: failure.error.clone(),
            };
        }
        if let Some(sheet) = report.sheets.get_mut(failure.index) {
            sheet.table = ReportTable::error(&failure.sheet, &failure.error);
        }
    }
    Ok((output.bytes, report))
}

// ==========================================
// ConversionApi - 转换 API（异步，组合外部协作者）
// ==========================================
pub struct ConversionApi<L, C>
where
    L: ReferenceLookup,
    C: PlannerConfigReader,
{
    lookup: Arc<L>,
    config: Arc<C>,
}

impl<L, C> ConversionApi<L, C>
where
    L: ReferenceLookup,
    C: PlannerConfigReader,
{
    pub fn new(lookup: Arc<L>, config: Arc<C>) -> Self {
        Self { lookup, config }
    }

    /// 转换 xlsx 字节
    #[instrument(skip_all, fields(input_bytes = raw.len()))]
    pub async fn process_workbook(&self, raw: &[u8]) -> ApiResult<ConversionResponse> {
        if raw.is_empty() {
            return Err(ApiError::InvalidInput("输入工作簿为空".to_string()));
        }
        let source = XlsxSheetSource::from_bytes(raw.to_vec());
        self.convert(&source).await
    }

    /// 转换文件（xlsx / csv），写出到 output
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub async fn convert_file(&self, input: &Path, output: &Path) -> ApiResult<ConversionSummary> {
        let source = UniversalSheetSource::open(input)?;
        let response = self.convert(source.as_ref()).await?;
        tokio::fs::write(output, &response.bytes)
            .await
            .map_err(|e| ApiError::Export(e.into()))?;
        info!(path = %output.display(), bytes = response.bytes.len(), "输出工作簿已写入");
        Ok(response.summary)
    }

    async fn convert(&self, source: &dyn SheetSource) -> ApiResult<ConversionResponse> {
        let started_at = Utc::now();
        let conversion_id = Uuid::new_v4().to_string();

        let config = self.config.load_planner_config().await?;
        let records = self.lookup.fetch_records().await?;
        let reference = ReferenceIndex::build(records);

        info!(
            conversion_id = %conversion_id,
            reference_count = reference.len(),
            "开始转换"
        );

        let (bytes, report) = run(source, &reference, &config)?;

        let summary = ConversionSummary {
            conversion_id,
            started_at,
            finished_at: Utc::now(),
            config,
            reference_count: reference.len(),
            sheets: report.outcomes,
        };

        info!(
            conversion_id = %summary.conversion_id,
            sheets = summary.sheets.len(),
            failed_sheets = summary.failed_sheet_count(),
            elapsed_ms = summary.elapsed_ms(),
            "转换完成"
        );

        Ok(ConversionResponse { bytes, summary })
    }
}
