// ==========================================
// NGO 補助核銷系統 - 补助导入服务
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 读取 → 解码 → 解析 → 落库
// 说明: 解码与解析为纯计算，放在 blocking 线程池执行
// ==========================================

use crate::config::SettingsManager;
use crate::domain::options::ReferenceLists;
use crate::domain::record::{
    ImportContext, ManualEntry, SubsidyRecord, MANUAL_ENTRY_REGION, MANUAL_ENTRY_WORKER,
};
use crate::importer::collaborators::{Clock, IdGenerator, LocalClock, UuidIdGenerator};
use crate::importer::disbursement_parser::DisbursementParser;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::reference_list_parser::ReferenceListParser;
use crate::repository::SubsidyRecordRepository;
use crate::workbook::{decode_workbook, Workbook, WorkbookFormat};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

// ==========================================
// ImportOutcome - 单档导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub batch_id: String,
    /// 仓储中的批次编号；预览或零记录时为 0
    pub batch_no: i64,
    pub records: Vec<SubsidyRecord>,
    pub total_amount: f64,
}

// ==========================================
// SubsidyImporter Trait
// ==========================================
#[async_trait]
pub trait SubsidyImporter: Send + Sync {
    /// 导入撥款名冊并落库
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 本批次记录（全部落库）
    /// - Err: 文件读取、格式、结构或数据库错误；失败时不写入任何记录
    async fn import_file(&self, path: &Path, context: &ImportContext)
        -> ImportResult<ImportOutcome>;

    /// 只解析不落库（导入前预览）
    async fn preview_file(
        &self,
        path: &Path,
        context: &ImportContext,
    ) -> ImportResult<Vec<SubsidyRecord>>;

    /// 导入参考清单并合并进系统设定
    async fn import_reference_lists(&self, path: &Path) -> ImportResult<ReferenceLists>;

    /// 并发导入多个文件，各文件互不影响
    async fn batch_import(
        &self,
        paths: Vec<PathBuf>,
        context: &ImportContext,
    ) -> Vec<Result<ImportOutcome, String>>;

    /// 单笔补登
    fn add_manual_entry(&self, entry: ManualEntry) -> ImportResult<SubsidyRecord>;
}

// ==========================================
// SubsidyImporterImpl
// ==========================================
pub struct SubsidyImporterImpl {
    record_repo: SubsidyRecordRepository,
    settings: SettingsManager,
    parser: Arc<DisbursementParser>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl SubsidyImporterImpl {
    pub fn new(
        record_repo: SubsidyRecordRepository,
        settings: SettingsManager,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let parser = Arc::new(DisbursementParser::new(
            Arc::clone(&id_generator),
            Arc::clone(&clock),
        ));
        Self {
            record_repo,
            settings,
            parser,
            id_generator,
            clock,
        }
    }

    /// 使用 UUID 与本地时钟
    pub fn with_defaults(record_repo: SubsidyRecordRepository, settings: SettingsManager) -> Self {
        Self::new(
            record_repo,
            settings,
            Arc::new(UuidIdGenerator),
            Arc::new(LocalClock),
        )
    }

    async fn read_workbook(path: &Path) -> ImportResult<Workbook> {
        let format = format_from_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        let workbook =
            tokio::task::spawn_blocking(move || decode_workbook(&bytes, format)).await??;
        Ok(workbook)
    }

    async fn parse_file(
        &self,
        path: &Path,
        context: &ImportContext,
    ) -> ImportResult<Vec<SubsidyRecord>> {
        let workbook = Self::read_workbook(path).await?;
        let parser = Arc::clone(&self.parser);
        let context = context.clone();
        let records = tokio::task::spawn_blocking(move || parser.parse(&workbook, &context))
            .await?
            .map_err(|e| {
                warn!(reason = e.reason(), "撥款名冊结构不符");
                ImportError::from(e)
            })?;
        Ok(records)
    }
}

/// 根据扩展名决定格式提示
pub fn format_from_path(path: &Path) -> ImportResult<WorkbookFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    WorkbookFormat::from_extension(ext).ok_or_else(|| ImportError::UnsupportedFormat(ext.to_string()))
}

#[async_trait]
impl SubsidyImporter for SubsidyImporterImpl {
    #[instrument(skip(self, path, context), fields(file = %path.display()))]
    async fn import_file(
        &self,
        path: &Path,
        context: &ImportContext,
    ) -> ImportResult<ImportOutcome> {
        let batch_id = self.id_generator.next_id();
        info!(batch_id = %batch_id, region = %context.region, month = %context.month, "开始导入撥款名冊");

        let records = self.parse_file(path, context).await?;
        let batch_no = self.record_repo.insert_batch(&records).map_err(|e| {
            error!(batch_id = %batch_id, error = %e, "记录落库失败");
            ImportError::from(e)
        })?;

        let total_amount: f64 = records.iter().map(|r| r.amount).sum();
        info!(
            batch_id = %batch_id,
            batch_no,
            records = records.len(),
            total_amount,
            "撥款名冊导入完成"
        );

        Ok(ImportOutcome {
            batch_id,
            batch_no,
            records,
            total_amount,
        })
    }

    #[instrument(skip(self, path, context), fields(file = %path.display()))]
    async fn preview_file(
        &self,
        path: &Path,
        context: &ImportContext,
    ) -> ImportResult<Vec<SubsidyRecord>> {
        self.parse_file(path, context).await
    }

    #[instrument(skip(self, path), fields(file = %path.display()))]
    async fn import_reference_lists(&self, path: &Path) -> ImportResult<ReferenceLists> {
        let workbook = Self::read_workbook(path).await?;
        let lists = tokio::task::spawn_blocking(move || ReferenceListParser.parse(&workbook))
            .await?
            .map_err(|e| {
                warn!(reason = e.reason(), "参考清单结构不符");
                ImportError::from(e)
            })?;
        self.settings.merge_reference_lists(&lists)?;
        Ok(lists)
    }

    async fn batch_import(
        &self,
        paths: Vec<PathBuf>,
        context: &ImportContext,
    ) -> Vec<Result<ImportOutcome, String>> {
        use futures::future::join_all;

        info!(count = paths.len(), "开始批量导入");

        let tasks = paths.iter().map(|path| async move {
            match self.import_file(path, context).await {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    error!(file = %path.display(), error = %e, "文件导入失败");
                    Err(format!("{}: {}", path.display(), e))
                }
            }
        });
        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );
        results
    }

    fn add_manual_entry(&self, entry: ManualEntry) -> ImportResult<SubsidyRecord> {
        if !(entry.amount.is_finite() && entry.amount > 0.0) {
            return Err(ImportError::InvalidAmount(entry.amount));
        }

        let record = SubsidyRecord {
            id: self.id_generator.next_id(),
            submit_time: self.clock.timestamp(),
            region: MANUAL_ENTRY_REGION.to_string(),
            worker: MANUAL_ENTRY_WORKER.to_string(),
            client_name: entry.client_name.trim().to_string(),
            month: self.clock.current_month(),
            item: entry.item.trim().to_string(),
            amount: entry.amount,
            source: entry.source.trim().to_string(),
            remarks: entry.remarks.trim().to_string(),
        };
        self.record_repo.insert(&record)?;
        info!(id = %record.id, amount = record.amount, "单笔补登完成");
        Ok(record)
    }
}
