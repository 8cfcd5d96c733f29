// ==========================================
// 劳动力市场转型看板 - 数据源层
// ==========================================
// 职责: 职业名 → WorkforceMetrics 的只读查询
// 生命周期: 构造 → init()（唯一的异步边界）→ 同步 get()
// 实现者: InMemoryMetricsProvider / JsonMetricsProvider / SqliteMetricsProvider
// ==========================================

pub mod error;
pub mod json_provider;
pub mod memory;
pub mod sqlite_provider;

use crate::domain::metrics::WorkforceMetrics;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub use error::{ProviderError, ProviderResult};
pub use json_provider::{JsonMetricsProvider, ScenarioRows};
pub use memory::InMemoryMetricsProvider;
pub use sqlite_provider::SqliteMetricsProvider;

// ==========================================
// MetricsProvider Trait
// ==========================================
// 用途: 展示层的唯一数据入口
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// 加载数据（幂等,重复调用不重新加载）
    async fn init(&mut self) -> ProviderResult<()>;

    /// 是否已完成加载
    fn is_ready(&self) -> bool;

    /// 查询单个职业的指标
    ///
    /// # 返回
    /// - Ok(None): 职业不存在（由调用方转为无数据状态）
    /// - Err(NotInitialized): 尚未 init
    fn get(&self, occupation: &str) -> ProviderResult<Option<WorkforceMetrics>>;

    /// 全部职业名（未排序）
    fn occupations(&self) -> ProviderResult<Vec<String>>;

    /// 数据集元信息（未加载时为 None）
    fn dataset_info(&self) -> Option<&DatasetInfo> {
        None
    }

    /// 情景级附带结果（剩余缺口、转岗流向、增加值变化）
    fn highlights(&self) -> Option<&ScenarioHighlights> {
        None
    }
}

// ==========================================
// ScenarioHighlights - 情景级附带结果
// ==========================================

/// 剩余缺口（按职业名）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedShortage {
    pub occupation: String,
    pub shortage: f64,
}

/// 主要转岗流向（按职业名）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTransition {
    pub source: String,
    pub target: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioHighlights {
    pub remaining_shortages: Vec<NamedShortage>,
    pub top_transitions: Vec<NamedTransition>,
    pub added_value_change_percent: Option<f64>, // 增加值变化（百分比）
}

// ==========================================
// DatasetInfo - 数据集元信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub source: String,                 // 数据来源描述（文件路径 / 数据库 / memory）
    pub scenario_key: Option<String>,   // 情景键
    pub occupation_count: usize,        // 行数（含汇总行）
    pub synthesized_aggregate: bool,    // 汇总行是否由各行求和生成
    pub skipped_rows: usize,            // 无法映射而跳过的行数
    pub loaded_at: DateTime<Utc>,       // 加载时间
}

impl DatasetInfo {
    pub fn new(source: impl Into<String>, scenario_key: Option<String>) -> Self {
        Self {
            source: source.into(),
            scenario_key,
            occupation_count: 0,
            synthesized_aggregate: false,
            skipped_rows: 0,
            loaded_at: Utc::now(),
        }
    }
}

/// 补齐汇总行
///
/// 数据集中不存在 aggregate_key 对应的行时,按字段求和生成一行
///
/// # 返回
/// - true: 生成了汇总行
pub fn ensure_aggregate_row(
    rows: &mut BTreeMap<String, WorkforceMetrics>,
    aggregate_key: &str,
) -> bool {
    if rows.is_empty() || rows.contains_key(aggregate_key) {
        return false;
    }
    let total: WorkforceMetrics = rows.values().copied().sum();
    rows.insert(aggregate_key.to_string(), total);
    true
}
