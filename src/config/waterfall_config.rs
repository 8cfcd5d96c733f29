// ==========================================
// 劳动力市场转型看板 - 瀑布图配置
// ==========================================
// 职责: 管线常量（小值阈值、汇总行窗口、刻度上限等）的集中定义
// 来源优先级: 默认值 → JSON 文件 → config_kv 覆写
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值无效: key={key}, value={value}")]
    InvalidValue { key: String, value: String },

    #[error("配置校验失败: {0}")]
    Validation(String),

    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 默认汇总行名称
pub const DEFAULT_AGGREGATE_KEY: &str = "Totaal";

/// 汇总行固定纵轴窗口（绝对量,便于与各职业的自适应刻度区分）
pub const DEFAULT_AGGREGATE_DOMAIN: (f64, f64) = (6_000_000.0, 11_000_000.0);

/// 人数噪声阈值: |value| < 20 视为 0
pub const DEFAULT_NOISE_FLOOR: f64 = 20.0;

// ==========================================
// WaterfallConfig - 瀑布图配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// 小值归零阈值
    pub noise_floor: f64,

    /// 汇总行的职业名称
    pub aggregate_key: String,

    /// 汇总行纵轴下限
    pub aggregate_domain_min: f64,

    /// 汇总行纵轴上限
    pub aggregate_domain_max: f64,

    /// 刻度数上限
    pub max_tick_count: u32,

    /// 纵轴留白上限倍数
    pub headroom_factor: f64,

    /// 连接线端点内缩（柱宽的一半,单位: 横轴序号）
    pub connector_inset: f64,

    /// 横轴标签换行宽度（字符数）
    pub label_wrap_width: usize,

    /// 标签语言（nl / en）
    pub locale: String,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            noise_floor: DEFAULT_NOISE_FLOOR,
            aggregate_key: DEFAULT_AGGREGATE_KEY.to_string(),
            aggregate_domain_min: DEFAULT_AGGREGATE_DOMAIN.0,
            aggregate_domain_max: DEFAULT_AGGREGATE_DOMAIN.1,
            max_tick_count: 8,
            headroom_factor: 1.2,
            connector_inset: 0.3,
            label_wrap_width: 21,
            locale: "nl".to_string(),
        }
    }
}

impl WaterfallConfig {
    /// 从 JSON 字符串加载（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: WaterfallConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// 校验配置取值
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.noise_floor.is_finite() && self.noise_floor >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "noise_floor 必须为非负有限数: {}",
                self.noise_floor
            )));
        }
        if self.aggregate_key.trim().is_empty() {
            return Err(ConfigError::Validation("aggregate_key 不能为空".to_string()));
        }
        if !(self.aggregate_domain_min.is_finite()
            && self.aggregate_domain_max.is_finite()
            && self.aggregate_domain_min < self.aggregate_domain_max)
        {
            return Err(ConfigError::Validation(format!(
                "汇总行窗口无效: [{}, {}]",
                self.aggregate_domain_min, self.aggregate_domain_max
            )));
        }
        if self.max_tick_count == 0 {
            return Err(ConfigError::Validation("max_tick_count 必须大于 0".to_string()));
        }
        if !(self.headroom_factor.is_finite() && self.headroom_factor >= 1.0) {
            return Err(ConfigError::Validation(format!(
                "headroom_factor 必须 >= 1: {}",
                self.headroom_factor
            )));
        }
        if !(0.0..0.5).contains(&self.connector_inset) {
            return Err(ConfigError::Validation(format!(
                "connector_inset 必须位于 [0, 0.5): {}",
                self.connector_inset
            )));
        }
        if self.label_wrap_width == 0 {
            return Err(ConfigError::Validation("label_wrap_width 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 汇总行窗口
    pub fn aggregate_domain(&self) -> (f64, f64) {
        (self.aggregate_domain_min, self.aggregate_domain_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WaterfallConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregate_domain(), (6_000_000.0, 11_000_000.0));
        assert_eq!(config.aggregate_key, "Totaal");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WaterfallConfig::from_json_str(r#"{"locale": "en", "noise_floor": 50}"#).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.noise_floor, 50.0);
        assert_eq!(config.max_tick_count, 8);
    }

    #[test]
    fn test_inverted_aggregate_window_rejected() {
        let result = WaterfallConfig::from_json_str(
            r#"{"aggregate_domain_min": 10, "aggregate_domain_max": 5}"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_headroom_below_one_rejected() {
        let config = WaterfallConfig {
            headroom_factor: 0.9,
            ..WaterfallConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
