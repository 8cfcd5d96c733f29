// ==========================================
// 劳动力市场转型看板 - 布局配置
// ==========================================
// 职责: 桌面 / 移动两套布局常量（同一几何核心,仅常量不同）
// - 桌面: 三块面板横向排列,宽度按柱数比例分配,纵轴在外侧
// - 移动: 三块面板纵向堆叠,纵轴统一在左侧,标签不换行
// ==========================================

use crate::domain::types::{PanelKind, SegmentCategory};
use serde::Serialize;

/// 桌面布局中带纵轴面板的额外宽度（像素）
pub const AXIS_WIDTH_PX: u32 = 200;

// ==========================================
// 基础类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// 柱体填充
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarFill {
    pub color: &'static str,
    pub opacity: f64,
}

impl BarFill {
    const fn solid(color: &'static str) -> Self {
        Self { color, opacity: 1.0 }
    }

    const fn faded(color: &'static str, opacity: f64) -> Self {
        Self { color, opacity }
    }
}

/// 面板宽度: 占比 + 固定像素
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelWidth {
    pub fraction: f64,
    pub extra_px: u32,
}

// ==========================================
// Palette - 配色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub final_projection: BarFill,
    pub excess_workers: BarFill,
    pub shortage_reduction: BarFill,
    pub shortage: BarFill,
    pub positive: BarFill,
    pub negative: BarFill,
    pub label_positive: &'static str,
    pub label_shortage_reduction: &'static str,
    pub label_negative: &'static str,
}

const FINAL_TEAL: &str = "rgb(0,153,168)";
const LIGHT_TEAL: &str = "rgb(145,204,214)";
const GROWTH_GREEN: &str = "rgb(75,169,115)";
const DECLINE_RED: &str = "rgb(231,76,60)";

impl Palette {
    /// 柱体填充
    ///
    /// 类别优先;普通柱按正负区分
    pub fn fill(&self, category: SegmentCategory, value: f64) -> BarFill {
        match category {
            SegmentCategory::FinalProjection => self.final_projection,
            SegmentCategory::ExcessWorkers => self.excess_workers,
            SegmentCategory::ShortageReduction => self.shortage_reduction,
            SegmentCategory::Shortage => self.shortage,
            SegmentCategory::Plain if value >= 0.0 => self.positive,
            SegmentCategory::Plain => self.negative,
        }
    }

    /// 数值标签颜色（零按非负处理）
    pub fn label_color(&self, category: SegmentCategory, display_value: f64) -> &'static str {
        if display_value < 0.0 {
            self.label_negative
        } else if category == SegmentCategory::ShortageReduction {
            self.label_shortage_reduction
        } else {
            self.label_positive
        }
    }
}

const DESKTOP_PALETTE: Palette = Palette {
    final_projection: BarFill::solid(FINAL_TEAL),
    excess_workers: BarFill::solid(LIGHT_TEAL),
    shortage_reduction: BarFill::solid(LIGHT_TEAL),
    shortage: BarFill::solid(LIGHT_TEAL),
    positive: BarFill::solid(GROWTH_GREEN),
    negative: BarFill::solid(DECLINE_RED),
    label_positive: "#10b981",
    label_shortage_reduction: "rgb(0,168,153)",
    label_negative: "#ef4444",
};

const MOBILE_PALETTE: Palette = Palette {
    final_projection: BarFill::solid(FINAL_TEAL),
    excess_workers: BarFill::faded(FINAL_TEAL, 0.5),
    shortage_reduction: BarFill::solid(FINAL_TEAL),
    shortage: BarFill::faded(FINAL_TEAL, 0.5),
    ..DESKTOP_PALETTE
};

// ==========================================
// LayoutProfile - 布局配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutProfile {
    pub kind: LayoutKind,
    pub chart_height: u32,
    pub bar_size: u32,
    pub margins_with_axis: Margins,
    pub margins_without_axis: Margins,
    pub x_label_height: u32,
    pub x_label_angle: i32,
    pub x_label_font_size: u32,
    pub x_label_line_height: u32,
    pub footnote_marker_font_size: u32,
    pub value_label_font_size: u32,
    pub axis_tick_font_size: u32,
    pub wrap_labels: bool,       // 移动端标签不换行
    pub compact_titles: bool,    // 移动端使用简短标题
    pub stacked: bool,           // 面板纵向堆叠
    pub palette: Palette,
}

impl LayoutProfile {
    pub fn desktop() -> Self {
        Self {
            kind: LayoutKind::Desktop,
            chart_height: 500,
            bar_size: 40,
            margins_with_axis: Margins {
                top: 40,
                right: 60,
                bottom: 0,
                left: 60,
            },
            margins_without_axis: Margins {
                top: 40,
                right: 30,
                bottom: 0,
                left: 30,
            },
            x_label_height: 100,
            x_label_angle: -45,
            x_label_font_size: 9,
            x_label_line_height: 12,
            footnote_marker_font_size: 7,
            value_label_font_size: 12,
            axis_tick_font_size: 12,
            wrap_labels: true,
            compact_titles: false,
            stacked: false,
            palette: DESKTOP_PALETTE,
        }
    }

    pub fn mobile() -> Self {
        Self {
            kind: LayoutKind::Mobile,
            chart_height: 400,
            bar_size: 30,
            margins_with_axis: Margins {
                top: 30,
                right: 10,
                bottom: 80,
                left: 10,
            },
            margins_without_axis: Margins {
                top: 30,
                right: 5,
                bottom: 80,
                left: 5,
            },
            x_label_height: 120,
            x_label_angle: -45,
            x_label_font_size: 9,
            x_label_line_height: 10,
            footnote_marker_font_size: 6,
            value_label_font_size: 10,
            axis_tick_font_size: 12,
            wrap_labels: false,
            compact_titles: true,
            stacked: true,
            palette: MOBILE_PALETTE,
        }
    }

    pub fn for_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Desktop => Self::desktop(),
            LayoutKind::Mobile => Self::mobile(),
        }
    }

    /// 面板纵轴位置（None 表示隐藏）
    pub fn axis_for(&self, panel: PanelKind) -> Option<AxisSide> {
        match (self.kind, panel) {
            (LayoutKind::Mobile, _) => Some(AxisSide::Left),
            (LayoutKind::Desktop, PanelKind::Supply) => Some(AxisSide::Left),
            (LayoutKind::Desktop, PanelKind::Gap) => None,
            (LayoutKind::Desktop, PanelKind::Demand) => Some(AxisSide::Right),
        }
    }

    pub fn margins(&self, show_axis: bool) -> Margins {
        if show_axis {
            self.margins_with_axis
        } else {
            self.margins_without_axis
        }
    }

    /// 面板宽度
    ///
    /// 桌面布局按柱数比例分配,带纵轴的面板另加 AXIS_WIDTH_PX;
    /// 纵向堆叠布局每块面板占满整行
    pub fn panel_width(&self, panel: PanelKind, bar_counts: &[(PanelKind, usize)]) -> PanelWidth {
        if self.stacked {
            return PanelWidth {
                fraction: 1.0,
                extra_px: 0,
            };
        }

        let total: usize = bar_counts.iter().map(|(_, n)| n).sum();
        let own = bar_counts
            .iter()
            .find(|(kind, _)| *kind == panel)
            .map_or(0, |(_, n)| *n);
        let fraction = if total == 0 {
            1.0 / bar_counts.len().max(1) as f64
        } else {
            own as f64 / total as f64
        };

        PanelWidth {
            fraction,
            extra_px: if self.axis_for(panel).is_some() {
                AXIS_WIDTH_PX
            } else {
                0
            },
        }
    }
}
