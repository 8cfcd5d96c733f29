// ==========================================
// 劳动力市场转型看板 - 领域类型定义
// ==========================================
// 职责: 面板种类、堆叠方向、柱体类别等闭合枚举
// 红线: 柱体类别互斥,只能用单一枚举表达,不允许多个布尔标记并存
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 面板种类 (Panel Kind)
// ==========================================
// 顺序: 供给 → 缺口 → 需求 (与看板从左到右的排布一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelKind {
    Supply, // 劳动力供给
    Gap,    // 供需匹配
    Demand, // 劳动力需求
}

impl PanelKind {
    /// 看板中的全部面板（按展示顺序）
    pub const ALL: [PanelKind; 3] = [PanelKind::Supply, PanelKind::Gap, PanelKind::Demand];

    /// 面板对应的堆叠方向
    pub fn stack_direction(&self) -> StackDirection {
        match self {
            PanelKind::Supply => StackDirection::Left,
            PanelKind::Gap => StackDirection::Anchored,
            PanelKind::Demand => StackDirection::Right,
        }
    }

    /// 国际化键前缀
    pub fn i18n_key(&self) -> &'static str {
        match self {
            PanelKind::Supply => "supply",
            PanelKind::Gap => "gap",
            PanelKind::Demand => "demand",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelKind::Supply => write!(f, "SUPPLY"),
            PanelKind::Gap => write!(f, "GAP"),
            PanelKind::Demand => write!(f, "DEMAND"),
        }
    }
}

// ==========================================
// 堆叠方向 (Stack Direction)
// ==========================================
// Left: 从 0 起向右累加
// Right: 从总和起向右递减,最后一根柱落在 0
// Anchored: 基线由数据映射显式给出（缺口面板）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackDirection {
    Left,
    Right,
    Anchored,
}

impl StackDirection {
    /// 柱体标识前缀（用于连接线/渲染 key 稳定）
    pub fn id_prefix(&self) -> &'static str {
        match self {
            StackDirection::Left => "left",
            StackDirection::Right => "right",
            StackDirection::Anchored => "gap",
        }
    }
}

impl fmt::Display for StackDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackDirection::Left => write!(f, "LEFT"),
            StackDirection::Right => write!(f, "RIGHT"),
            StackDirection::Anchored => write!(f, "ANCHORED"),
        }
    }
}

// ==========================================
// 柱体类别 (Segment Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentCategory {
    #[default]
    Plain,             // 普通增减
    FinalProjection,   // 2035 年终值
    ExcessWorkers,     // 过剩人员
    Shortage,          // 剩余缺口
    ShortageReduction, // 转岗填补的缺口
}

impl fmt::Display for SegmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentCategory::Plain => write!(f, "PLAIN"),
            SegmentCategory::FinalProjection => write!(f, "FINAL_PROJECTION"),
            SegmentCategory::ExcessWorkers => write!(f, "EXCESS_WORKERS"),
            SegmentCategory::Shortage => write!(f, "SHORTAGE"),
            SegmentCategory::ShortageReduction => write!(f, "SHORTAGE_REDUCTION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_stack_direction() {
        assert_eq!(PanelKind::Supply.stack_direction(), StackDirection::Left);
        assert_eq!(PanelKind::Demand.stack_direction(), StackDirection::Right);
        assert_eq!(PanelKind::Gap.stack_direction(), StackDirection::Anchored);
    }

    #[test]
    fn test_category_display_matches_serde() {
        for category in [
            SegmentCategory::Plain,
            SegmentCategory::FinalProjection,
            SegmentCategory::ExcessWorkers,
            SegmentCategory::Shortage,
            SegmentCategory::ShortageReduction,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }
}
