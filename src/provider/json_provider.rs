// ==========================================
// 劳动力市场转型看板 - JSON 数据集数据源
// ==========================================
// 输入文件:
// - model-results.json: { 情景键: { remainingShortages, topTransitions, workforceChanges, addedValueChangePercent } }
// - job-names.json: { jobId: 职业名 }
// 处理:
// - 两个文件并发读取
// - workforceChanges 的 jobId 映射为职业名,无法映射的行跳过并告警
// - 数据集中没有汇总行时按字段求和生成
// ==========================================

use crate::config::waterfall_config::DEFAULT_AGGREGATE_KEY;
use crate::domain::metrics::WorkforceMetrics;
use crate::domain::scenario::ScenarioKey;
use crate::perf::PerfGuard;
use crate::provider::{
    ensure_aggregate_row, DatasetInfo, MetricsProvider, NamedShortage, NamedTransition,
    ProviderError, ProviderResult, ScenarioHighlights,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

// ==========================================
// 文件结构
// ==========================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobShortageRecord {
    job_id: i64,
    shortage: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobTransitionRecord {
    source_job_id: i64,
    target_job_id: i64,
    amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelResultRecord {
    #[serde(default)]
    remaining_shortages: Vec<JobShortageRecord>,
    #[serde(default)]
    top_transitions: Vec<JobTransitionRecord>,
    #[serde(default)]
    workforce_changes: HashMap<String, WorkforceMetrics>,
    #[serde(default)]
    added_value_change_percent: Option<f64>,
}

#[derive(Debug, Default)]
struct LoadedScenario {
    rows: BTreeMap<String, WorkforceMetrics>,
    highlights: ScenarioHighlights,
}

/// 单个情景的映射结果（批量导入用）
#[derive(Debug, Clone)]
pub struct ScenarioRows {
    pub scenario: ScenarioKey,
    pub rows: BTreeMap<String, WorkforceMetrics>,
    pub info: DatasetInfo,
}

type ModelResults = HashMap<String, ModelResultRecord>;
type JobNames = HashMap<String, String>;

// ==========================================
// JsonMetricsProvider
// ==========================================
pub struct JsonMetricsProvider {
    results_path: PathBuf,
    job_names_path: PathBuf,
    scenario: Option<ScenarioKey>,
    aggregate_key: String,
    loaded: Option<LoadedScenario>,
    info: Option<DatasetInfo>,
}

impl JsonMetricsProvider {
    /// 创建数据源
    ///
    /// # 参数
    /// - results_path: model-results.json 路径
    /// - job_names_path: job-names.json 路径
    /// - scenario: 情景;None 时取排序后的第一个情景
    pub fn new(
        results_path: impl Into<PathBuf>,
        job_names_path: impl Into<PathBuf>,
        scenario: Option<ScenarioKey>,
    ) -> Self {
        Self {
            results_path: results_path.into(),
            job_names_path: job_names_path.into(),
            scenario,
            aggregate_key: DEFAULT_AGGREGATE_KEY.to_string(),
            loaded: None,
            info: None,
        }
    }

    pub fn with_aggregate_key(mut self, aggregate_key: impl Into<String>) -> Self {
        self.aggregate_key = aggregate_key.into();
        self
    }

    fn loaded(&self) -> ProviderResult<&LoadedScenario> {
        self.loaded.as_ref().ok_or(ProviderError::NotInitialized)
    }

    /// 并发读取两个数据集文件
    async fn read_files(&self) -> ProviderResult<(ModelResults, JobNames)> {
        futures::try_join!(
            read_json(&self.results_path),
            read_json(&self.job_names_path)
        )
    }

    /// 一次解析结果文件,映射出全部情景
    ///
    /// 情景键无法解析的条目跳过并告警;不改变当前数据源的加载状态
    ///
    /// # 返回
    /// - 按情景键排序的映射结果
    #[instrument(skip(self), fields(results = %self.results_path.display()))]
    pub async fn load_all_scenarios(&self) -> ProviderResult<Vec<ScenarioRows>> {
        let _perf = PerfGuard::with_detail(
            "provider.json.load_all",
            self.results_path.display().to_string(),
        );

        let (results, job_names) = self.read_files().await?;
        let mut keys: Vec<&String> = results.keys().collect();
        keys.sort();

        let mut all = Vec::with_capacity(keys.len());
        for key in keys {
            let scenario = match ScenarioKey::parse(key) {
                Ok(scenario) => scenario,
                Err(e) => {
                    warn!(key = %key, error = %e, "情景键无法解析,跳过");
                    continue;
                }
            };
            let (rows, info) = self.map_rows(key, &results[key], &job_names);
            all.push(ScenarioRows {
                scenario,
                rows,
                info,
            });
        }

        info!(scenarios = all.len(), "结果文件解析完成");
        Ok(all)
    }

    /// 按情景键查找结果,键不完全一致时按解析后的参数比较（如 "1-..." 与 "1.0-..."）
    fn find_scenario<'a>(
        results: &'a ModelResults,
        wanted: &ScenarioKey,
    ) -> Option<(&'a String, &'a ModelResultRecord)> {
        let encoded = wanted.encode();
        results.get_key_value(&encoded).or_else(|| {
            results
                .iter()
                .find(|(key, _)| ScenarioKey::parse(key).map_or(false, |k| &k == wanted))
        })
    }

    /// workforceChanges → 职业行;无法映射的 jobId 跳过,缺汇总行时补齐
    fn map_rows(
        &self,
        key: &str,
        record: &ModelResultRecord,
        job_names: &JobNames,
    ) -> (BTreeMap<String, WorkforceMetrics>, DatasetInfo) {
        let mut rows = BTreeMap::new();
        let mut skipped = 0usize;
        let mut job_ids: Vec<&String> = record.workforce_changes.keys().collect();
        job_ids.sort();
        for job_id in job_ids {
            let metrics = record.workforce_changes[job_id];
            match job_names.get(job_id) {
                Some(name) => {
                    if rows.insert(name.clone(), metrics).is_some() {
                        warn!(job_id = %job_id, occupation = %name, "职业名重复,后出现的行覆盖前者");
                    }
                }
                None => {
                    skipped += 1;
                    warn!(job_id = %job_id, scenario = %key, "job-names 中无此 jobId,跳过该行");
                }
            }
        }

        let synthesized = ensure_aggregate_row(&mut rows, &self.aggregate_key);

        let mut info = DatasetInfo::new(self.results_path.display().to_string(), Some(key.to_string()));
        info.occupation_count = rows.len();
        info.synthesized_aggregate = synthesized;
        info.skipped_rows = skipped;
        (rows, info)
    }

    fn build(&self, results: ModelResults, job_names: JobNames) -> ProviderResult<(LoadedScenario, DatasetInfo)> {
        let (key, record) = match &self.scenario {
            Some(wanted) => Self::find_scenario(&results, wanted)
                .ok_or_else(|| ProviderError::ScenarioNotFound(wanted.encode()))?,
            None => results
                .iter()
                .min_by(|a, b| a.0.cmp(b.0))
                .ok_or_else(|| ProviderError::ScenarioNotFound("<empty>".to_string()))?,
        };

        let (rows, info) = self.map_rows(key, record, &job_names);
        let highlights = map_highlights(record, &job_names);

        let loaded = LoadedScenario { rows, highlights };
        Ok((loaded, info))
    }
}

/// jobId → 职业名,未知 jobId 显示为 "?"
fn map_highlights(record: &ModelResultRecord, job_names: &JobNames) -> ScenarioHighlights {
    let name_of = |id: i64| {
        job_names
            .get(&id.to_string())
            .cloned()
            .unwrap_or_else(|| "?".to_string())
    };

    ScenarioHighlights {
        remaining_shortages: record
            .remaining_shortages
            .iter()
            .map(|s| NamedShortage {
                occupation: name_of(s.job_id),
                shortage: s.shortage,
            })
            .collect(),
        top_transitions: record
            .top_transitions
            .iter()
            .map(|t| NamedTransition {
                source: name_of(t.source_job_id),
                target: name_of(t.target_job_id),
                amount: t.amount,
            })
            .collect(),
        added_value_change_percent: record.added_value_change_percent,
    }
}

/// 异步读取并解析 JSON 文件
async fn read_json<T: DeserializeOwned>(path: &Path) -> ProviderResult<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| ProviderError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[async_trait]
impl MetricsProvider for JsonMetricsProvider {
    #[instrument(skip(self), fields(results = %self.results_path.display()))]
    async fn init(&mut self) -> ProviderResult<()> {
        if self.loaded.is_some() {
            return Ok(());
        }

        let _perf = PerfGuard::with_detail("provider.json.init", self.results_path.display().to_string());

        let (results, job_names) = self.read_files().await?;
        let (loaded, info) = self.build(results, job_names)?;
        info!(
            scenario = info.scenario_key.as_deref().unwrap_or(""),
            occupations = info.occupation_count,
            skipped = info.skipped_rows,
            synthesized_aggregate = info.synthesized_aggregate,
            "JSON 数据集加载完成"
        );

        self.loaded = Some(loaded);
        self.info = Some(info);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    fn get(&self, occupation: &str) -> ProviderResult<Option<WorkforceMetrics>> {
        Ok(self.loaded()?.rows.get(occupation).copied())
    }

    fn occupations(&self) -> ProviderResult<Vec<String>> {
        Ok(self.loaded()?.rows.keys().cloned().collect())
    }

    fn dataset_info(&self) -> Option<&DatasetInfo> {
        self.info.as_ref()
    }

    fn highlights(&self) -> Option<&ScenarioHighlights> {
        self.loaded.as_ref().map(|l| &l.highlights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const RESULTS: &str = r#"{
        "1.0-with-standard-standard-standard": {
            "remainingShortages": [{"jobId": 0, "shortage": 120}],
            "topTransitions": [{"sourceJobId": 1, "targetJobId": 0, "amount": 40}],
            "workforceChanges": {
                "0": {"labor_supply": 1000, "net_labor_change": 50, "transitions_in": 30,
                      "transitions_out": 10, "superfluous_workers": 40, "shortage": 20,
                      "productivity": -15, "expansion_demand": 25, "reduction_demand": -5,
                      "vacancies": 60},
                "1": {"labor_supply": 500, "net_labor_change": -20, "transitions_in": 0,
                      "transitions_out": 40, "superfluous_workers": 60, "shortage": 0,
                      "productivity": -30, "expansion_demand": 0, "reduction_demand": -50,
                      "vacancies": 10},
                "7": {"labor_supply": 1, "net_labor_change": 0, "transitions_in": 0,
                      "transitions_out": 0, "superfluous_workers": 0, "shortage": 0,
                      "productivity": 0, "expansion_demand": 0, "reduction_demand": 0,
                      "vacancies": 0}
            },
            "addedValueChangePercent": 2.5
        }
    }"#;

    const NAMES: &str = r#"{"0": "Verpleegkundigen", "1": "Administratief medewerkers"}"#;

    #[tokio::test]
    async fn test_load_maps_names_and_synthesizes_aggregate() {
        let results = write_temp(RESULTS);
        let names = write_temp(NAMES);

        let key = ScenarioKey::parse("1-with-standard-standard-standard").unwrap();
        let mut provider = JsonMetricsProvider::new(results.path(), names.path(), Some(key));
        provider.init().await.unwrap();

        let mut occupations = provider.occupations().unwrap();
        occupations.sort();
        assert_eq!(
            occupations,
            vec!["Administratief medewerkers", "Totaal", "Verpleegkundigen"]
        );

        let total = provider.get("Totaal").unwrap().unwrap();
        assert_eq!(total.labor_supply, 1500.0);

        let info = provider.dataset_info().unwrap();
        assert_eq!(info.skipped_rows, 1);
        assert!(info.synthesized_aggregate);

        let highlights = provider.highlights().unwrap();
        assert_eq!(highlights.remaining_shortages[0].occupation, "Verpleegkundigen");
        assert_eq!(highlights.top_transitions[0].source, "Administratief medewerkers");
        assert_eq!(highlights.added_value_change_percent, Some(2.5));
    }

    #[tokio::test]
    async fn test_unknown_scenario() {
        let results = write_temp(RESULTS);
        let names = write_temp(NAMES);

        let key = ScenarioKey::parse("1.5-without-standard-standard-standard").unwrap();
        let mut provider = JsonMetricsProvider::new(results.path(), names.path(), Some(key));
        let err = provider.init().await.unwrap_err();
        assert!(matches!(err, ProviderError::ScenarioNotFound(_)));
        assert!(!provider.is_ready());
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let names = write_temp(NAMES);
        let mut provider =
            JsonMetricsProvider::new("/nonexistent/model-results.json", names.path(), None);
        match provider.init().await {
            Err(ProviderError::Io { path, .. }) => assert!(path.contains("model-results.json")),
            other => panic!("Expected Io error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_load_all_scenarios_skips_bad_keys() {
        let supply = |labor_supply: f64| {
            serde_json::to_string(&WorkforceMetrics {
                labor_supply,
                ..WorkforceMetrics::default()
            })
            .unwrap()
        };
        let results = write_temp(&format!(
            r#"{{
                "1.5-without-standard-standard-standard": {{"workforceChanges": {{"0": {a}}}}},
                "onbekend": {{"workforceChanges": {{}}}},
                "1.0-with-standard-standard-standard": {{"workforceChanges": {{"1": {b}}}}}
            }}"#,
            a = supply(10.0),
            b = supply(20.0),
        ));
        let names = write_temp(NAMES);

        let provider = JsonMetricsProvider::new(results.path(), names.path(), None);
        let all = provider.load_all_scenarios().await.unwrap();

        let keys: Vec<String> = all.iter().map(|s| s.scenario.encode()).collect();
        assert_eq!(
            keys,
            vec![
                "1.0-with-standard-standard-standard",
                "1.5-without-standard-standard-standard"
            ]
        );
        assert_eq!(all[0].rows["Totaal"].labor_supply, 20.0);
        assert_eq!(all[1].rows.len(), 2);
        // 批量解析不改变数据源本身的状态
        assert!(!provider.is_ready());
    }

    #[tokio::test]
    async fn test_get_before_init() {
        let provider = JsonMetricsProvider::new("a.json", "b.json", None);
        assert!(matches!(provider.get("x"), Err(ProviderError::NotInitialized)));
    }
}
