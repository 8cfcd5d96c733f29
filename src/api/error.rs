// ==========================================
// 劳动力市场转型看板 - API层错误类型
// ==========================================
// 职责: 定义展示层错误类型,将数据源/配置错误转换为可读的错误消息
// 说明: 职业不存在不是错误（进入无数据状态）,单块面板失败也不是错误
// ==========================================

use crate::config::waterfall_config::ConfigError;
use crate::provider::error::ProviderError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 查找错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("数据源未就绪: {0}")]
    DataSourceNotReady(String),

    #[error("数据源错误: {0}")]
    DataSourceError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),
}

// ==========================================
// 从 ProviderError 转换
// ==========================================
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotInitialized => {
                ApiError::DataSourceNotReady("数据源尚未初始化,请先调用 init()".to_string())
            }
            ProviderError::ScenarioNotFound(key) => {
                ApiError::NotFound(format!("情景(key={})不存在", key))
            }
            ProviderError::Database(e) => ApiError::DatabaseError(e.to_string()),
            ProviderError::Lock(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            e @ (ProviderError::Io { .. } | ProviderError::Json { .. }) => {
                ApiError::DataSourceError(e.to_string())
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
