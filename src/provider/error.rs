// ==========================================
// 劳动力市场转型看板 - 数据源层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据源层错误类型
#[derive(Error, Debug)]
pub enum ProviderError {
    // ===== 生命周期错误 =====
    #[error("数据源尚未初始化")]
    NotInitialized,

    // ===== 文件错误 =====
    #[error("文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 解析失败: {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ===== 数据库错误 =====
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("数据库锁获取失败: {0}")]
    Lock(String),

    // ===== 情景错误 =====
    #[error("情景不存在: {0}")]
    ScenarioNotFound(String),
}

/// Result 类型别名
pub type ProviderResult<T> = Result<T, ProviderError>;
