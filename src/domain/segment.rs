// ==========================================
// 劳动力市场转型看板 - 瀑布图柱体模型
// ==========================================
// 职责: 柱体草稿、已堆叠柱体、面板数据集、脚注
// 生命周期: 每次选择职业时重新生成,生成后不再修改
// ==========================================

use crate::domain::types::{PanelKind, SegmentCategory, StackDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Footnote - 脚注
// ==========================================
// 唯一性: 按 number 去重;展示时三块面板的脚注合并排序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footnote {
    pub number: u32,
    pub text: String,
}

impl Footnote {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

// ==========================================
// SegmentDraft - 柱体草稿（数据映射输出）
// ==========================================
// value 已取整并完成小值归零
// base 仅缺口面板显式给出,其余面板由堆叠计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDraft {
    pub name: String,
    pub value: f64,
    pub category: SegmentCategory,
    pub footnote: Option<Footnote>,
    pub base: Option<f64>,
}

impl SegmentDraft {
    /// 普通柱体草稿
    pub fn plain(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            category: SegmentCategory::Plain,
            footnote: None,
            base: None,
        }
    }

    pub fn with_category(mut self, category: SegmentCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_footnote(mut self, footnote: Footnote) -> Self {
        self.footnote = Some(footnote);
        self
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }
}

// ==========================================
// SegmentId - 柱体标识
// ==========================================
// 格式: {left|right|gap}-{index},index 从 0 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId {
    pub direction: StackDirection,
    pub index: usize,
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.direction.id_prefix(), self.index)
    }
}

impl Serialize for SegmentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ==========================================
// ChartSegment - 已堆叠柱体
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
    pub id: SegmentId,
    pub name: String,
    pub value: f64,          // 有符号增量（已归零）
    pub display_value: f64,  // 标签展示值
    pub ordinal: u32,        // 横轴位置,从 1 开始
    pub base: f64,           // 堆叠偏移
    pub running_total: f64,  // base + value
    pub category: SegmentCategory,
    pub footnote: Option<Footnote>,
}

impl ChartSegment {
    /// 柱体顶端（正值）或底端（负值）所在的 y 值
    pub fn top(&self) -> f64 {
        self.base + self.value
    }

    /// 柱体的最低可见点
    pub fn lowest_point(&self) -> f64 {
        if self.value >= 0.0 {
            self.base
        } else {
            self.base + self.value
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

// ==========================================
// CascadeDataset - 单块面板的数据集
// ==========================================
// 不变量: ordinal 从 1 连续;base 与面板堆叠方向一致
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeDataset {
    pub panel: PanelKind,
    pub direction: StackDirection,
    pub segments: Vec<ChartSegment>,
}

impl CascadeDataset {
    pub fn new(panel: PanelKind, segments: Vec<ChartSegment>) -> Self {
        Self {
            panel,
            direction: panel.stack_direction(),
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 所有柱体的 base + value 最大值
    pub fn max_top(&self) -> Option<f64> {
        self.segments
            .iter()
            .map(ChartSegment::top)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }

    /// 数据集中带脚注的柱体的脚注
    pub fn footnotes(&self) -> impl Iterator<Item = &Footnote> {
        self.segments.iter().filter_map(|s| s.footnote.as_ref())
    }
}
