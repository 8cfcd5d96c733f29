// ==========================================
// 劳动力市场转型看板 - API 层
// ==========================================
// 职责: 提供展示 API,供命令行与渲染适配层调用
// ==========================================

pub mod dto;
pub mod error;
pub mod waterfall_api;

// 重导出核心类型
pub use dto::{PanelOutcome, WaterfallState, WaterfallView};
pub use error::{ApiError, ApiResult};
pub use waterfall_api::{pool_footnotes, sort_occupations, WaterfallPresenter};
