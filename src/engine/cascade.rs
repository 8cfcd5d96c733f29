// ==========================================
// 劳动力市场转型看板 - 瀑布堆叠
// ==========================================
// 职责: 把有序的增量草稿转换为带 base / running_total 的柱体
// 方向:
// - Left: base₀ = 0, baseᵢ = baseᵢ₋₁ + valueᵢ₋₁（供给面板）
// - Right: total = Σ value, 逐个 total -= value, base = total（需求面板）
// - Anchored: base 取草稿显式给出的值（缺口面板）
// 红线: 纯函数,输入顺序不变,同一输入两次调用结果逐字节一致
// ==========================================

use crate::domain::segment::{ChartSegment, SegmentDraft, SegmentId};
use crate::domain::types::StackDirection;
use crate::engine::number_format::suppress_small;

// ==========================================
// CascadeBuilder - 瀑布堆叠器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeBuilder {
    noise_floor: f64,
}

impl CascadeBuilder {
    pub fn new(noise_floor: f64) -> Self {
        Self { noise_floor }
    }

    /// 按方向堆叠
    pub fn process(&self, direction: StackDirection, drafts: &[SegmentDraft]) -> Vec<ChartSegment> {
        match direction {
            StackDirection::Left => self.process_left(drafts),
            StackDirection::Right => self.process_right(drafts),
            StackDirection::Anchored => self.process_anchored(drafts),
        }
    }

    /// 从左向右累加
    pub fn process_left(&self, drafts: &[SegmentDraft]) -> Vec<ChartSegment> {
        let mut total = 0.0;
        drafts
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let value = suppress_small(draft.value, self.noise_floor);
                let base = total;
                total += value;
                self.segment(StackDirection::Left, index, draft, value, base)
            })
            .collect()
    }

    /// 从右向左累加,最后一根柱的 base 落在 0
    pub fn process_right(&self, drafts: &[SegmentDraft]) -> Vec<ChartSegment> {
        let values: Vec<f64> = drafts
            .iter()
            .map(|d| suppress_small(d.value, self.noise_floor))
            .collect();
        let mut total: f64 = values.iter().sum();

        drafts
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (draft, value))| {
                total -= value;
                self.segment(StackDirection::Right, index, draft, value, total)
            })
            .collect()
    }

    /// 使用草稿中的显式 base（缺省为 0）
    pub fn process_anchored(&self, drafts: &[SegmentDraft]) -> Vec<ChartSegment> {
        drafts
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let value = suppress_small(draft.value, self.noise_floor);
                let base = draft.base.unwrap_or(0.0);
                self.segment(StackDirection::Anchored, index, draft, value, base)
            })
            .collect()
    }

    fn segment(
        &self,
        direction: StackDirection,
        index: usize,
        draft: &SegmentDraft,
        value: f64,
        base: f64,
    ) -> ChartSegment {
        ChartSegment {
            id: SegmentId { direction, index },
            name: draft.name.clone(),
            value,
            display_value: value,
            ordinal: index as u32 + 1,
            base,
            running_total: base + value,
            category: draft.category,
            footnote: draft.footnote.clone(),
        }
    }
}
