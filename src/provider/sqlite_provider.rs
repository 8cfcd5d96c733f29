// ==========================================
// 劳动力市场转型看板 - SQLite 数据源
// ==========================================
// 表: workforce_metrics(scenario_key, occupation, 10 个指标列)
// 职责: 按情景键读取全部职业行;提供导入写入（事务化,整情景覆盖）
// ==========================================

use crate::config::waterfall_config::DEFAULT_AGGREGATE_KEY;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::metrics::WorkforceMetrics;
use crate::domain::scenario::ScenarioKey;
use crate::perf::PerfGuard;
use crate::provider::{
    ensure_aggregate_row, DatasetInfo, MetricsProvider, ProviderError, ProviderResult, ScenarioRows,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, instrument};

const SELECT_ROWS_SQL: &str = "SELECT occupation, labor_supply, net_labor_change, transitions_in, \
     transitions_out, superfluous_workers, shortage, productivity, expansion_demand, \
     reduction_demand, vacancies FROM workforce_metrics WHERE scenario_key = ?1 ORDER BY occupation";

const INSERT_ROW_SQL: &str = "INSERT INTO workforce_metrics (scenario_key, occupation, labor_supply, \
     net_labor_change, transitions_in, transitions_out, superfluous_workers, shortage, productivity, \
     expansion_demand, reduction_demand, vacancies) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

fn map_row(row: &Row<'_>) -> rusqlite::Result<(String, WorkforceMetrics)> {
    Ok((
        row.get(0)?,
        WorkforceMetrics {
            labor_supply: row.get(1)?,
            net_labor_change: row.get(2)?,
            transitions_in: row.get(3)?,
            transitions_out: row.get(4)?,
            superfluous_workers: row.get(5)?,
            shortage: row.get(6)?,
            productivity: row.get(7)?,
            expansion_demand: row.get(8)?,
            reduction_demand: row.get(9)?,
            vacancies: row.get(10)?,
        },
    ))
}

// ==========================================
// SqliteMetricsProvider
// ==========================================
pub struct SqliteMetricsProvider {
    conn: Arc<Mutex<Connection>>,
    scenario: ScenarioKey,
    aggregate_key: String,
    rows: Option<BTreeMap<String, WorkforceMetrics>>,
    info: Option<DatasetInfo>,
}

impl SqliteMetricsProvider {
    /// 打开数据库文件（自动建表）
    pub fn open(db_path: &str, scenario: ScenarioKey) -> ProviderResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn)), scenario))
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>, scenario: ScenarioKey) -> Self {
        Self {
            conn,
            scenario,
            aggregate_key: DEFAULT_AGGREGATE_KEY.to_string(),
            rows: None,
            info: None,
        }
    }

    pub fn with_aggregate_key(mut self, aggregate_key: impl Into<String>) -> Self {
        self.aggregate_key = aggregate_key.into();
        self
    }

    fn lock(conn: &Arc<Mutex<Connection>>) -> ProviderResult<MutexGuard<'_, Connection>> {
        conn.lock().map_err(|e| ProviderError::Lock(e.to_string()))
    }

    /// 整情景写入（先删后插,单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入行数
    pub fn save_scenario(
        conn: &Arc<Mutex<Connection>>,
        scenario: &ScenarioKey,
        rows: &BTreeMap<String, WorkforceMetrics>,
    ) -> ProviderResult<usize> {
        let key = scenario.encode();
        let _perf = PerfGuard::with_detail("provider.sqlite.save", key.clone());

        let mut conn = Self::lock(conn)?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM workforce_metrics WHERE scenario_key = ?1",
            params![key],
        )?;

        let mut written = 0;
        {
            let mut stmt = tx.prepare(INSERT_ROW_SQL)?;
            for (occupation, m) in rows {
                written += stmt.execute(params![
                    key,
                    occupation,
                    m.labor_supply,
                    m.net_labor_change,
                    m.transitions_in,
                    m.transitions_out,
                    m.superfluous_workers,
                    m.shortage,
                    m.productivity,
                    m.expansion_demand,
                    m.reduction_demand,
                    m.vacancies,
                ])?;
            }
        }
        tx.commit()?;

        info!(scenario = %key, rows = written, "情景指标已写入");
        Ok(written)
    }

    /// 批量写入多个情景（每个情景一个事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入总行数
    pub fn save_scenarios(
        conn: &Arc<Mutex<Connection>>,
        scenarios: &[ScenarioRows],
    ) -> ProviderResult<usize> {
        let mut total = 0;
        for scenario in scenarios {
            let written = Self::save_scenario(conn, &scenario.scenario, &scenario.rows)?;
            info!(
                scenario = %scenario.scenario,
                rows = written,
                skipped = scenario.info.skipped_rows,
                synthesized_aggregate = scenario.info.synthesized_aggregate,
                "情景导入完成"
            );
            total += written;
        }
        Ok(total)
    }

    /// 数据库中已有的情景键（排序）
    pub fn list_scenarios(conn: &Arc<Mutex<Connection>>) -> ProviderResult<Vec<String>> {
        let conn = Self::lock(conn)?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT scenario_key FROM workforce_metrics ORDER BY scenario_key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn load_rows(&self) -> ProviderResult<BTreeMap<String, WorkforceMetrics>> {
        let conn = Self::lock(&self.conn)?;
        let mut stmt = conn.prepare(SELECT_ROWS_SQL)?;
        let rows = stmt
            .query_map(params![self.scenario.encode()], map_row)?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }
}

#[async_trait]
impl MetricsProvider for SqliteMetricsProvider {
    #[instrument(skip(self), fields(scenario = %self.scenario))]
    async fn init(&mut self) -> ProviderResult<()> {
        if self.rows.is_some() {
            return Ok(());
        }

        let key = self.scenario.encode();
        let _perf = PerfGuard::with_detail("provider.sqlite.init", key.clone());

        let mut rows = self.load_rows()?;
        if rows.is_empty() {
            return Err(ProviderError::ScenarioNotFound(key));
        }

        let mut info = DatasetInfo::new("sqlite", Some(key));
        info.synthesized_aggregate = ensure_aggregate_row(&mut rows, &self.aggregate_key);
        info.occupation_count = rows.len();
        info!(occupations = info.occupation_count, "SQLite 指标加载完成");

        self.rows = Some(rows);
        self.info = Some(info);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.rows.is_some()
    }

    fn get(&self, occupation: &str) -> ProviderResult<Option<WorkforceMetrics>> {
        let rows = self.rows.as_ref().ok_or(ProviderError::NotInitialized)?;
        Ok(rows.get(occupation).copied())
    }

    fn occupations(&self) -> ProviderResult<Vec<String>> {
        let rows = self.rows.as_ref().ok_or(ProviderError::NotInitialized)?;
        Ok(rows.keys().cloned().collect())
    }

    fn dataset_info(&self) -> Option<&DatasetInfo> {
        self.info.as_ref()
    }
}
