// ==========================================
// NGO 補助核銷系統 - 命令行入口
// ==========================================
// 用法:
//   ngo-subsidy-ledger import <file> <region> <worker> <month>
//   ngo-subsidy-ledger preview <file> <region> <worker> <month>
//   ngo-subsidy-ledger import-lists <file>
//   ngo-subsidy-ledger add <client> <item> <amount> <source> [remarks]
//   ngo-subsidy-ledger list | stats | prompt | sync-payload | options
//   ngo-subsidy-ledger delete <id>
//   ngo-subsidy-ledger set-sync-url <url>
//
// 数据库路径: 环境变量 NGO_LEDGER_DB，默认为用户数据目录
// ==========================================

use anyhow::{anyhow, Context, Result};
use ngo_subsidy_ledger::config::SettingsManager;
use ngo_subsidy_ledger::db::{default_db_path, open_sqlite_connection};
use ngo_subsidy_ledger::report::{build_insight_prompt, build_sync_payload, format_amount, DashboardStats};
use ngo_subsidy_ledger::repository::SubsidyRecordRepository;
use ngo_subsidy_ledger::{logging, ImportContext, ManualEntry, SubsidyImporter, SubsidyImporterImpl};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const USAGE: &str = "用法: ngo-subsidy-ledger <import|preview|import-lists|add|list|delete|stats|prompt|sync-payload|options|set-sync-url> [參數...]";

fn required(args: &[String], idx: usize, name: &str) -> Result<String> {
    args.get(idx)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("缺少參數 <{}>\n{}", name, USAGE))
}

fn context_from(args: &[String]) -> Result<ImportContext> {
    Ok(ImportContext::new(
        required(args, 2, "region")?,
        required(args, 3, "worker")?,
        required(args, 4, "month")?,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("");

    let db_path = default_db_path();
    tracing::debug!(db_path = %db_path, "使用数据库");
    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("無法開啟資料庫 {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let records = SubsidyRecordRepository::new(Arc::clone(&conn));
    let settings = SettingsManager::new(Arc::clone(&conn));
    let importer = SubsidyImporterImpl::with_defaults(
        SubsidyRecordRepository::new(Arc::clone(&conn)),
        SettingsManager::new(Arc::clone(&conn)),
    );

    match command {
        "import" | "preview" => {
            let file = PathBuf::from(required(&args, 1, "file")?);
            let context = context_from(&args)?;

            if command == "import" {
                let outcome = importer
                    .import_file(&file, &context)
                    .await
                    .with_context(|| format!("匯入失敗: {}", file.display()))?;
                println!(
                    "匯入成功！共 {} 筆，合計 ${}",
                    outcome.records.len(),
                    format_amount(outcome.total_amount)
                );
            } else {
                let preview = importer.preview_file(&file, &context).await?;
                println!("{}", serde_json::to_string_pretty(&preview)?);
            }
        }
        "import-lists" => {
            let file = PathBuf::from(required(&args, 1, "file")?);
            let lists = importer.import_reference_lists(&file).await?;
            println!("{}", serde_json::to_string_pretty(&lists)?);
        }
        "add" => {
            let raw_amount = required(&args, 3, "amount")?;
            let amount: f64 = raw_amount
                .replace(',', "")
                .parse()
                .with_context(|| format!("金額必須是數字: {}", raw_amount))?;
            let entry = ManualEntry {
                client_name: required(&args, 1, "client")?,
                item: required(&args, 2, "item")?,
                amount,
                source: required(&args, 4, "source")?,
                remarks: args.get(5).cloned().unwrap_or_default(),
            };
            let record = importer.add_manual_entry(entry)?;
            println!("已新增紀錄 {}", record.id);
        }
        "list" => {
            println!("{}", serde_json::to_string_pretty(&records.list_all()?)?);
        }
        "delete" => {
            let id = required(&args, 1, "id")?;
            if records.delete_by_id(&id)? {
                println!("已刪除 {}", id);
            } else {
                println!("找不到紀錄 {}", id);
            }
        }
        "stats" => {
            let stats = DashboardStats::from_records(&records.list_all()?);
            println!("總核銷金額: ${}", format_amount(stats.total_amount));
            println!("累計服務個案: {}", stats.client_count);
            println!("經費來源數量: {}", stats.source_count);
        }
        "prompt" => {
            println!("{}", build_insight_prompt(&records.list_all()?)?);
        }
        "sync-payload" => {
            if settings.get_sync_url()?.is_none() {
                tracing::warn!("尚未设定同步端点");
            }
            let payload = build_sync_payload(&records.list_all()?);
            println!("{}", serde_json::to_string(&payload)?);
        }
        "options" => {
            println!("{}", serde_json::to_string_pretty(&settings.get_options()?)?);
        }
        "set-sync-url" => {
            settings.set_sync_url(&required(&args, 1, "url")?)?;
            println!("已更新同步端點");
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
