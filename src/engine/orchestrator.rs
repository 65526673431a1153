// ==========================================
// 备件库存规划 - Sheet 编排器
// ==========================================
// 流程（每个 sheet 独立）:
// 1. 列名解析 → 2. 标准行转换 → 3. 机台分块与过滤
// 4. 零件汇总 → 5. 报表构建
// 失败隔离: 任一 sheet 失败只产出该 sheet 的错误表，不影响其他 sheet
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::{BlockHeaderPolicy, OutputSheet, ReportTable, SheetTable};
use crate::engine::aggregator::PartAggregator;
use crate::engine::report_builder::ReportBuilder;
use crate::importer::{
    BlockStats, ColumnResolver, ImportResult, LoadedSheet, MachineBlockParser,
};
use crate::reference::ReferenceIndex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

// ==========================================
// SheetReport - 单 sheet 处理结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetReport {
    pub table: ReportTable,
    pub columns: BTreeMap<String, String>, // 标准字段名 → 实际表头
    pub stats: BlockStats,
    pub part_count: usize,    // 汇总后零件数
    pub machine_count: usize, // 贡献零件行的机台数
}

// ==========================================
// SheetOutcome - 单 sheet 结果摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetOutcome {
    Processed {
        sheet: String,
        parts: usize,
        machines: usize,
        rows_kept: usize,
        rows_discarded: usize,
        columns: BTreeMap<String, String>,
    },
    Failed {
        sheet: String,
        error: String,
    },
}

impl SheetOutcome {
    pub fn sheet(&self) -> &str {
        match self {
            SheetOutcome::Processed { sheet, .. } | SheetOutcome::Failed { sheet, .. } => sheet,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SheetOutcome::Failed { .. })
    }
}

/// 整个工作簿的处理结果（输出 sheet 与输入 sheet 一一对应、顺序一致）
#[derive(Debug, Clone, Default)]
pub struct WorkbookReport {
    pub sheets: Vec<OutputSheet>,
    pub outcomes: Vec<SheetOutcome>,
}

// ==========================================
// SheetOrchestrator
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetOrchestrator {
    resolver: ColumnResolver,
    policy: BlockHeaderPolicy,
    builder: ReportBuilder,
    config: PlannerConfig,
}

impl SheetOrchestrator {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            resolver: ColumnResolver::new(config.similarity_cutoff),
            policy: config.block_header_policy,
            builder: ReportBuilder::new(config.aggregation_mode()),
            config: config.clone(),
        }
    }

    /// 处理单个 sheet
    ///
    /// # 返回
    /// - Ok(SheetReport): 报表及统计
    /// - Err(ColumnNotFound): 必需列无法匹配
    pub fn process_sheet(
        &self,
        sheet: &SheetTable,
        reference: &ReferenceIndex,
    ) -> ImportResult<SheetReport> {
        let resolution = self.resolver.resolve(&sheet.headers)?;
        let mapping = resolution.mapping;

        let rows = sheet.rows.iter().map(|row| mapping.to_canonical_row(row));
        let mut parser = MachineBlockParser::new(rows, reference, self.policy);

        let mut aggregator = PartAggregator::new(self.config.aggregation_mode());
        aggregator.extend(parser.by_ref());
        let stats = parser.stats();

        debug!(
            sheet = %sheet.name,
            machine_blocks = stats.machine_blocks,
            header_rows = stats.header_rows,
            part_rows = stats.part_rows,
            discarded_rows = stats.discarded_rows,
            "机台分块完成"
        );

        let machines: BTreeSet<&str> = aggregator
            .accumulators()
            .iter()
            .flat_map(|acc| acc.serials.iter().map(String::as_str))
            .collect();
        let machine_count = machines.len();

        let table = self.builder.build(aggregator.accumulators());

        Ok(SheetReport {
            columns: mapping
                .header_names()
                .into_iter()
                .map(|(field, header)| (field.to_string(), header.to_string()))
                .collect(),
            part_count: aggregator.len(),
            machine_count,
            stats,
            table,
        })
    }

    /// 处理整个工作簿（逐 sheet，失败隔离）
    pub fn process_workbook(
        &self,
        sheets: Vec<LoadedSheet>,
        reference: &ReferenceIndex,
    ) -> WorkbookReport {
        info!(
            sheet_count = sheets.len(),
            reference_count = reference.len(),
            mode = %self.config.aggregation_mode(),
            policy = %self.policy,
            "开始处理工作簿"
        );

        let mut report = WorkbookReport::default();

        for loaded in sheets {
            let result = loaded
                .content
                .and_then(|table| self.process_sheet(&table, reference));

            match result {
                Ok(sheet_report) => {
                    info!(
                        sheet = %loaded.name,
                        parts = sheet_report.part_count,
                        machines = sheet_report.machine_count,
                        "sheet 处理完成"
                    );
                    report.outcomes.push(SheetOutcome::Processed {
                        sheet: loaded.name.clone(),
                        parts: sheet_report.part_count,
                        machines: sheet_report.machine_count,
                        rows_kept: sheet_report.stats.part_rows,
                        rows_discarded: sheet_report.stats.header_rows
                            + sheet_report.stats.discarded_rows,
                        columns: sheet_report.columns,
                    });
                    report.sheets.push(OutputSheet {
                        name: loaded.name,
                        table: sheet_report.table,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(sheet = %loaded.name, error = %message, "sheet 处理失败");
                    report.sheets.push(OutputSheet {
                        name: loaded.name.clone(),
                        table: ReportTable::error(&loaded.name, &message),
                    });
                    report.outcomes.push(SheetOutcome::Failed {
                        sheet: loaded.name,
                        error: message,
                    });
                }
            }
        }

        info!(
            processed = report.outcomes.iter().filter(|o| !o.is_failed()).count(),
            failed = report.outcomes.iter().filter(|o| o.is_failed()).count(),
            "工作簿处理完成"
        );
        report
    }
}
