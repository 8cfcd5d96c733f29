// ==========================================
// 劳动力市场转型看板 - 引擎层
// ==========================================
// 职责: 瀑布图的纯计算管线（映射 → 堆叠 → 纵轴 → 连接线）
// 红线: 引擎不访问数据源,不依赖渲染库,同一输入结果确定
// ==========================================

pub mod cascade;
pub mod chart_data;
pub mod connector;
pub mod domain_calc;
pub mod error;
pub mod number_format;
pub mod scale;

// 重导出核心引擎
pub use cascade::CascadeBuilder;
pub use chart_data::{ChartDataMapper, FOOTNOTE_FRICTIONAL, FOOTNOTE_SUPERFLUOUS};
pub use connector::ConnectorRouter;
pub use domain_calc::DomainCalculator;
pub use error::{ChartError, ChartResult};
pub use number_format::{round_and_suppress, suppress_small, NumberFormatter};
pub use scale::{ScaleAnalyzer, MIN_INCREMENT};
