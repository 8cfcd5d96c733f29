// ==========================================
// 劳动力市场转型看板 - 指标导入工具
// ==========================================
// 用法:
//   import_metrics <model-results.json> <job-names.json> [db-path] [scenario-key]
// 说明:
// - 结果文件只解析一次;未给出 scenario-key 时导入全部情景
// - 同一情景重复导入会整体覆盖
// - db-path 缺省时取 get_default_db_path()
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use workforce_waterfall::db::{init_schema, open_sqlite_connection, read_schema_version};
use workforce_waterfall::domain::ScenarioKey;
use workforce_waterfall::provider::{JsonMetricsProvider, SqliteMetricsProvider};
use workforce_waterfall::{get_default_db_path, logging};

const USAGE: &str =
    "usage: import_metrics <model-results.json> <job-names.json> [db-path] [scenario-key]";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 4 {
        bail!(USAGE);
    }
    let results_path = &args[0];
    let job_names_path = &args[1];
    let db_path = args
        .get(2)
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .unwrap_or_else(get_default_db_path);

    let wanted = args
        .get(3)
        .map(|raw| ScenarioKey::parse(raw))
        .transpose()
        .context("情景键无效")?;

    // 结果文件只解析一次
    let mut scenarios = JsonMetricsProvider::new(results_path, job_names_path, None)
        .load_all_scenarios()
        .await
        .with_context(|| format!("加载结果文件失败: {}", results_path))?;
    if let Some(wanted) = &wanted {
        scenarios.retain(|s| &s.scenario == wanted);
        if scenarios.is_empty() {
            bail!("结果文件中没有情景: {}", wanted);
        }
    }

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("打开数据库失败: {}", db_path))?;
    init_schema(&conn)?;
    let schema_version = read_schema_version(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let total = SqliteMetricsProvider::save_scenarios(&conn, &scenarios)?;

    let stored = SqliteMetricsProvider::list_scenarios(&conn)?;
    tracing::info!(
        db = %db_path,
        schema_version = ?schema_version,
        scenarios = scenarios.len(),
        rows = total,
        stored_scenarios = stored.len(),
        "导入结束"
    );
    println!("{} 个情景, {} 行 → {}", scenarios.len(), total, db_path);
    Ok(())
}
