// ==========================================
// 劳动力市场转型看板 - 渲染适配层
// ==========================================
// 职责: 把视图转换为绘图库无关的渲染计划
// 说明: 桌面与移动共用同一几何核心,只有布局常量不同
// ==========================================

pub mod layout;
pub mod plan;

pub use layout::{AxisSide, BarFill, LayoutKind, LayoutProfile, Margins, Palette, PanelWidth};
pub use plan::{
    format_percent, wrap_label, AxisTick, BarPlan, HighlightsPlan, MetricCardPlan, PanelPlan,
    RankedBar, RenderPlan, RenderPlanner, Tooltip, TransitionLink, ValueTone, HIGHLIGHT_TOP_N,
};
