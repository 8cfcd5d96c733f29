// ==========================================
// 劳动力市场转型看板 - 内存数据源
// ==========================================
// 用途: 测试与嵌入调用（数据已在内存中）
// ==========================================

use crate::domain::metrics::WorkforceMetrics;
use crate::provider::{ensure_aggregate_row, DatasetInfo, MetricsProvider, ProviderError, ProviderResult};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct InMemoryMetricsProvider {
    rows: BTreeMap<String, WorkforceMetrics>,
    aggregate_key: Option<String>,
    info: Option<DatasetInfo>,
}

impl InMemoryMetricsProvider {
    /// 从 (职业名, 指标) 创建,不补汇总行
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, WorkforceMetrics)>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            aggregate_key: None,
            info: None,
        }
    }

    /// init 时若缺少汇总行则按字段求和补齐
    pub fn with_aggregate(mut self, aggregate_key: impl Into<String>) -> Self {
        self.aggregate_key = Some(aggregate_key.into());
        self
    }
}

#[async_trait]
impl MetricsProvider for InMemoryMetricsProvider {
    async fn init(&mut self) -> ProviderResult<()> {
        if self.info.is_some() {
            return Ok(());
        }

        let mut info = DatasetInfo::new("memory", None);
        if let Some(key) = self.aggregate_key.as_deref() {
            info.synthesized_aggregate = ensure_aggregate_row(&mut self.rows, key);
        }
        info.occupation_count = self.rows.len();
        self.info = Some(info);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.info.is_some()
    }

    fn get(&self, occupation: &str) -> ProviderResult<Option<WorkforceMetrics>> {
        if !self.is_ready() {
            return Err(ProviderError::NotInitialized);
        }
        Ok(self.rows.get(occupation).copied())
    }

    fn occupations(&self) -> ProviderResult<Vec<String>> {
        if !self.is_ready() {
            return Err(ProviderError::NotInitialized);
        }
        Ok(self.rows.keys().cloned().collect())
    }

    fn dataset_info(&self) -> Option<&DatasetInfo> {
        self.info.as_ref()
    }
}
