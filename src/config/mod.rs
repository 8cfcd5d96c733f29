// ==========================================
// 劳动力市场转型看板 - 配置层
// ==========================================
// 职责: 管线配置定义与多级覆写
// 存储: 默认值 / JSON 文件 / config_kv 表
// ==========================================

pub mod config_manager;
pub mod waterfall_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use waterfall_config::{
    ConfigError, ConfigResult, WaterfallConfig, DEFAULT_AGGREGATE_DOMAIN, DEFAULT_AGGREGATE_KEY,
    DEFAULT_NOISE_FLOOR,
};
