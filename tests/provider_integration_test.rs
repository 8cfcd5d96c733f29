// ==========================================
// 数据源集成测试
// ==========================================
// 测试目标: JSON 数据集加载、SQLite 整情景写入与读取、展示器接入
// ==========================================


use std::sync::{Arc, Mutex};

use test_helpers::{
    create_test_db, sample_metrics, shrinking_metrics, write_dataset_files, SCENARIO_KEY,
    SECOND_SCENARIO_KEY,
};
use workforce_waterfall::api::WaterfallPresenter;
use workforce_waterfall::config::WaterfallConfig;
use workforce_waterfall::db::open_sqlite_connection;
use workforce_waterfall::domain::ScenarioKey;
use workforce_waterfall::provider::{
    JsonMetricsProvider, MetricsProvider, ProviderError, SqliteMetricsProvider,
};

#[tokio::test]
async fn test_json_provider_loads_requested_scenario() {
    let (results, names) = write_dataset_files().expect("Failed to write dataset files");

    // "1-..." 与文件中的 "1.0-..." 按解析后的参数匹配
    let key = ScenarioKey::parse("1-with-standard-standard-standard").unwrap();
    let mut provider = JsonMetricsProvider::new(results.path(), names.path(), Some(key));
    provider.init().await.expect("Failed to init provider");

    assert!(provider.is_ready());
    assert_eq!(provider.get("Verpleegkundigen").unwrap(), Some(sample_metrics()));
    assert_eq!(provider.get("Onbekend").unwrap(), None);

    let info = provider.dataset_info().expect("dataset info should exist");
    assert_eq!(info.scenario_key.as_deref(), Some(SCENARIO_KEY));
    assert_eq!(info.skipped_rows, 1);
    assert!(info.synthesized_aggregate);
    assert_eq!(info.occupation_count, 3);

    let total = provider.get("Totaal").unwrap().expect("aggregate row");
    assert_eq!(total.labor_supply, 1500.0);
    assert_eq!(total.net_labor_change, 30.0);

    // 未知 jobId 显示为 "?"
    let highlights = provider.highlights().expect("highlights after init");
    assert_eq!(highlights.remaining_shortages[0].occupation, "Verpleegkundigen");
    assert_eq!(highlights.remaining_shortages[1].occupation, "?");
    assert_eq!(highlights.added_value_change_percent, Some(1.8));
}

#[tokio::test]
async fn test_json_provider_defaults_to_first_scenario() {
    let (results, names) = write_dataset_files().expect("Failed to write dataset files");

    let mut provider = JsonMetricsProvider::new(results.path(), names.path(), None);
    provider.init().await.unwrap();

    let info = provider.dataset_info().unwrap();
    assert_eq!(info.scenario_key.as_deref(), Some(SCENARIO_KEY));
}

#[tokio::test]
async fn test_json_provider_rejects_malformed_file() {
    let results = test_helpers::write_temp_file("{ not json").unwrap();
    let names = test_helpers::write_temp_file("{}").unwrap();

    let mut provider = JsonMetricsProvider::new(results.path(), names.path(), None);
    match provider.init().await {
        Err(ProviderError::Json { path, .. }) => {
            assert_eq!(path, results.path().display().to_string())
        }
        other => panic!("Expected Json error, got {:?}", other),
    }
    assert!(!provider.is_ready());
}

#[tokio::test]
async fn test_sqlite_round_trip_through_presenter() {
    let (results, names) = write_dataset_files().expect("Failed to write dataset files");
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");

    let key = ScenarioKey::parse(SCENARIO_KEY).unwrap();
    let scenarios = JsonMetricsProvider::new(results.path(), names.path(), None)
        .load_all_scenarios()
        .await
        .unwrap();
    let first = &scenarios[0];
    assert_eq!(first.scenario, key);

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
    let written = SqliteMetricsProvider::save_scenario(&conn, &key, &first.rows).unwrap();
    assert_eq!(written, 3);

    // 重复写入整体覆盖,不产生重复行
    let rewritten = SqliteMetricsProvider::save_scenario(&conn, &key, &first.rows).unwrap();
    assert_eq!(rewritten, 3);
    assert_eq!(
        SqliteMetricsProvider::list_scenarios(&conn).unwrap(),
        vec![SCENARIO_KEY.to_string()]
    );

    let mut sqlite = SqliteMetricsProvider::open(&db_path, key).unwrap();
    sqlite.init().await.unwrap();
    assert_eq!(sqlite.get("Verpleegkundigen").unwrap(), Some(sample_metrics()));
    assert_eq!(
        sqlite.get("administratief medewerkers").unwrap(),
        Some(shrinking_metrics())
    );

    let mut presenter = WaterfallPresenter::new(Arc::new(sqlite), WaterfallConfig::default()).unwrap();
    assert_eq!(presenter.selected(), Some("Totaal"));

    let view = presenter
        .select("Verpleegkundigen")
        .unwrap()
        .view()
        .expect("should be ready")
        .clone();
    assert_eq!((view.domain.min, view.domain.max), (0.0, 1200.0));
}

#[tokio::test]
async fn test_bulk_import_of_all_scenarios() {
    let (results, names) = write_dataset_files().expect("Failed to write dataset files");
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");

    let scenarios = JsonMetricsProvider::new(results.path(), names.path(), None)
        .load_all_scenarios()
        .await
        .expect("Failed to load scenarios");
    assert_eq!(scenarios.len(), 2);

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path).unwrap()));
    // 情景 1: 2 个职业 + 汇总行;情景 2: 1 个职业 + 汇总行
    let written = SqliteMetricsProvider::save_scenarios(&conn, &scenarios).unwrap();
    assert_eq!(written, 5);

    let row_count: i64 = conn
        .lock()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM workforce_metrics", [], |row| row.get(0))
        .unwrap();
    assert_eq!(row_count, 5);
    assert_eq!(
        SqliteMetricsProvider::list_scenarios(&conn).unwrap(),
        vec![SCENARIO_KEY.to_string(), SECOND_SCENARIO_KEY.to_string()]
    );

    // 再次导入整体覆盖
    assert_eq!(SqliteMetricsProvider::save_scenarios(&conn, &scenarios).unwrap(), 5);

    let mut second = SqliteMetricsProvider::open(&db_path, ScenarioKey::parse(SECOND_SCENARIO_KEY).unwrap()).unwrap();
    second.init().await.unwrap();
    assert_eq!(second.get("Verpleegkundigen").unwrap(), Some(shrinking_metrics()));
}

#[tokio::test]
async fn test_sqlite_unknown_scenario() {
    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");

    let key = ScenarioKey::parse(SECOND_SCENARIO_KEY).unwrap();
    let mut provider = SqliteMetricsProvider::open(&db_path, key).unwrap();
    let err = provider.init().await.unwrap_err();
    assert!(matches!(err, ProviderError::ScenarioNotFound(_)));
    assert!(matches!(provider.get("Totaal"), Err(ProviderError::NotInitialized)));
}
