// ==========================================
// 劳动力市场转型看板 - 领域模型层
// ==========================================
// 职责: 定义输入指标、柱体、坐标轴、情景键等领域类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod chart;
pub mod metrics;
pub mod scenario;
pub mod segment;
pub mod types;

// 重导出核心类型
pub use chart::{AxisDomain, ConnectorSegment, DomainSource};
pub use metrics::WorkforceMetrics;
pub use scenario::{ScenarioKey, ScenarioKeyError, Steering};
pub use segment::{CascadeDataset, ChartSegment, Footnote, SegmentDraft, SegmentId};
pub use types::{PanelKind, SegmentCategory, StackDirection};
