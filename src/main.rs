// ==========================================
// 劳动力市场转型看板 - 命令行入口
// ==========================================
// 用法:
//   workforce-waterfall <model-results.json> <job-names.json> [scenario-key] [occupation]
//                       [--mobile] [--config <config.json>] [--db <config.db>]
//   workforce-waterfall --metrics-db <metrics.db> [scenario-key] [occupation] [...]
// 数据来源: JSON 数据集文件,或 import_metrics 写入的 SQLite 库（未给情景时取第一个情景）
// 输出: stdout 打印渲染计划 JSON（职业无数据时打印状态 JSON）;日志写 stderr
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use workforce_waterfall::api::{WaterfallPresenter, WaterfallState};
use workforce_waterfall::config::{ConfigManager, WaterfallConfig};
use workforce_waterfall::db::{init_schema, open_sqlite_connection};
use workforce_waterfall::domain::ScenarioKey;
use workforce_waterfall::{i18n, logging};
use workforce_waterfall::provider::{JsonMetricsProvider, MetricsProvider, SqliteMetricsProvider};
use workforce_waterfall::render::{LayoutKind, LayoutProfile, RenderPlanner};

const USAGE: &str = "usage: workforce-waterfall (<model-results.json> <job-names.json> | \
--metrics-db <metrics.db>) [scenario-key] [occupation] [--mobile] [--config <config.json>] \
[--db <config.db>]";

/// 指标数据来源
#[derive(Debug, Clone, PartialEq)]
enum MetricsSource {
    Json {
        results_path: String,
        job_names_path: String,
    },
    Sqlite {
        db_path: String,
    },
}

#[derive(Debug)]
struct CliArgs {
    source: MetricsSource,
    scenario: Option<String>,
    occupation: Option<String>,
    mobile: bool,
    config_path: Option<String>,
    db_path: Option<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut mobile = false;
    let mut config_path = None;
    let mut db_path = None;
    let mut metrics_db = None;
    let mut positional = Vec::new();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--mobile" => mobile = true,
            "--config" => config_path = Some(raw.next().context("--config 缺少路径")?),
            "--db" => db_path = Some(raw.next().context("--db 缺少路径")?),
            "--metrics-db" => metrics_db = Some(raw.next().context("--metrics-db 缺少路径")?),
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let source = match metrics_db {
        Some(path) => MetricsSource::Sqlite { db_path: path },
        None => MetricsSource::Json {
            results_path: positional.next().context(USAGE)?,
            job_names_path: positional.next().context(USAGE)?,
        },
    };

    let mut args = CliArgs {
        source,
        scenario: None,
        occupation: None,
        mobile,
        config_path,
        db_path,
    };
    args.scenario = positional.next().filter(|s| !s.trim().is_empty());
    args.occupation = positional.next();
    if positional.next().is_some() {
        bail!(USAGE);
    }
    Ok(args)
}

/// 打开 SQLite 指标库;未给情景时取库中排序后的第一个情景
fn open_sqlite_provider(db_path: &str, scenario: Option<ScenarioKey>) -> Result<SqliteMetricsProvider> {
    if let Some(scenario) = scenario {
        return SqliteMetricsProvider::open(db_path, scenario)
            .with_context(|| format!("打开指标数据库失败: {}", db_path));
    }

    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("打开指标数据库失败: {}", db_path))?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let stored = SqliteMetricsProvider::list_scenarios(&conn)?;
    let first = stored
        .first()
        .with_context(|| format!("指标数据库中没有情景: {}", db_path))?;
    let scenario = ScenarioKey::parse(first).context("数据库中的情景键无效")?;
    Ok(SqliteMetricsProvider::from_connection(conn, scenario))
}

/// 按数据来源创建并初始化数据源
async fn open_provider(
    source: &MetricsSource,
    scenario: Option<ScenarioKey>,
    aggregate_key: &str,
) -> Result<Arc<dyn MetricsProvider>> {
    match source {
        MetricsSource::Json {
            results_path,
            job_names_path,
        } => {
            let mut provider = JsonMetricsProvider::new(results_path, job_names_path, scenario)
                .with_aggregate_key(aggregate_key);
            provider.init().await?;
            Ok(Arc::new(provider))
        }
        MetricsSource::Sqlite { db_path } => {
            let mut provider = open_sqlite_provider(db_path, scenario)?.with_aggregate_key(aggregate_key);
            provider.init().await?;
            Ok(Arc::new(provider))
        }
    }
}

fn load_config(args: &CliArgs) -> Result<WaterfallConfig> {
    let base = match &args.config_path {
        Some(path) => WaterfallConfig::from_json_file(path)
            .with_context(|| format!("加载配置文件失败: {}", path))?,
        None => WaterfallConfig::default(),
    };

    match &args.db_path {
        Some(db_path) => {
            let manager = ConfigManager::new(db_path)
                .with_context(|| format!("打开配置数据库失败: {}", db_path))?;
            Ok(manager.load_waterfall_config(base)?)
        }
        None => Ok(base),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = load_config(&args)?;
    i18n::set_locale(i18n::normalize_locale(&config.locale));

    tracing::info!(
        version = workforce_waterfall::VERSION,
        source = ?args.source,
        locale = %i18n::current_locale(),
        "{} 启动",
        workforce_waterfall::APP_NAME
    );

    let scenario = args
        .scenario
        .as_deref()
        .map(ScenarioKey::parse)
        .transpose()
        .context("情景键无效")?;

    let provider = open_provider(&args.source, scenario, &config.aggregate_key).await?;
    let mut presenter = WaterfallPresenter::new(provider, config.clone())?;
    if let Some(occupation) = &args.occupation {
        presenter.select(occupation)?;
    }

    let kind = if args.mobile {
        LayoutKind::Mobile
    } else {
        LayoutKind::Desktop
    };
    let planner = RenderPlanner::new(LayoutProfile::for_kind(kind), &config);

    let output = match presenter.state() {
        WaterfallState::Ready(view) => {
            serde_json::to_string_pretty(&planner.plan_with_highlights(view, presenter.highlights()))?
        }
        state @ WaterfallState::NoData { .. } => serde_json::to_string_pretty(state)?,
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_positional_and_flags() {
        let parsed = parse_args(args(&[
            "results.json",
            "--mobile",
            "names.json",
            "1.0-with-a-b-c",
            "Leraren",
            "--db",
            "cfg.db",
        ]))
        .unwrap();
        assert_eq!(
            parsed.source,
            MetricsSource::Json {
                results_path: "results.json".to_string(),
                job_names_path: "names.json".to_string(),
            }
        );
        assert_eq!(parsed.scenario.as_deref(), Some("1.0-with-a-b-c"));
        assert_eq!(parsed.occupation.as_deref(), Some("Leraren"));
        assert!(parsed.mobile);
        assert_eq!(parsed.db_path.as_deref(), Some("cfg.db"));
    }

    #[test]
    fn test_parse_args_requires_two_files() {
        assert!(parse_args(args(&["results.json"])).is_err());
        assert!(parse_args(args(&["a", "b", "c", "d", "e"])).is_err());
    }

    #[test]
    fn test_parse_args_metrics_db_source() {
        let parsed = parse_args(args(&[
            "--metrics-db",
            "metrics.db",
            "1.0-with-standard-standard-standard",
            "Leraren",
        ]))
        .unwrap();
        assert_eq!(
            parsed.source,
            MetricsSource::Sqlite {
                db_path: "metrics.db".to_string()
            }
        );
        assert_eq!(
            parsed.scenario.as_deref(),
            Some("1.0-with-standard-standard-standard")
        );
        assert_eq!(parsed.occupation.as_deref(), Some("Leraren"));

        assert!(parse_args(args(&["--metrics-db"])).is_err());
        assert!(parse_args(args(&["--metrics-db", "m.db", "a", "b", "c"])).is_err());
    }

    #[tokio::test]
    async fn test_open_provider_reads_first_stored_scenario() {
        use std::collections::BTreeMap;
        use workforce_waterfall::domain::WorkforceMetrics;

        let db_file = tempfile::NamedTempFile::new().unwrap();
        let db_path = db_file.path().to_str().unwrap().to_string();
        let conn = open_sqlite_connection(&db_path).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let mut rows = BTreeMap::new();
        rows.insert(
            "Leraren".to_string(),
            WorkforceMetrics {
                labor_supply: 800.0,
                ..WorkforceMetrics::default()
            },
        );
        for key in ["1.5-without-a-b-c", "1.0-with-a-b-c"] {
            SqliteMetricsProvider::save_scenario(&conn, &ScenarioKey::parse(key).unwrap(), &rows).unwrap();
        }

        let source = MetricsSource::Sqlite { db_path };
        let provider = open_provider(&source, None, "Totaal").await.unwrap();
        let info = provider.dataset_info().unwrap();
        assert_eq!(info.scenario_key.as_deref(), Some("1.0-with-a-b-c"));
        assert_eq!(provider.get("Leraren").unwrap().unwrap().labor_supply, 800.0);
        assert!(provider.get("Totaal").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_provider_empty_metrics_db() {
        let db_file = tempfile::NamedTempFile::new().unwrap();
        let source = MetricsSource::Sqlite {
            db_path: db_file.path().to_str().unwrap().to_string(),
        };
        assert!(open_provider(&source, None, "Totaal").await.is_err());
    }
}
