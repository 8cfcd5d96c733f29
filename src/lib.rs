// ==========================================
// 劳动力市场转型看板 - 核心库
// ==========================================
// 系统定位: 2024→2035 劳动力供需预测的瀑布图数据管线
// 数据流: 数据源 → 指标映射 → 瀑布堆叠 / 纵轴 → 连接线 → 渲染计划
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "nl");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 纯计算管线
pub mod engine;

// 数据源层 - 指标加载
pub mod provider;

// 配置层 - 管线配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 展示状态机
pub mod api;

// 渲染适配层 - 布局与渲染计划
pub mod render;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AxisDomain, CascadeDataset, ChartSegment, ConnectorSegment, DomainSource, Footnote,
    PanelKind, ScenarioKey, SegmentCategory, StackDirection, WorkforceMetrics,
};

// 引擎
pub use engine::{
    CascadeBuilder, ChartDataMapper, ConnectorRouter, DomainCalculator, NumberFormatter,
    ScaleAnalyzer,
};

// 数据源
pub use provider::{InMemoryMetricsProvider, JsonMetricsProvider, MetricsProvider, SqliteMetricsProvider};

// API
pub use api::{WaterfallPresenter, WaterfallState, WaterfallView};

// 渲染
pub use render::{LayoutProfile, RenderPlan, RenderPlanner};

// 配置
pub use config::{ConfigManager, WaterfallConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "劳动力市场转型看板";

// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "WORKFORCE_WATERFALL_DB_PATH";

/// 默认数据库路径
///
/// 优先级: 环境变量 WORKFORCE_WATERFALL_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./workforce_waterfall.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("workforce-waterfall");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("workforce_waterfall.db");
        }
    }

    path.to_string_lossy().to_string()
}
