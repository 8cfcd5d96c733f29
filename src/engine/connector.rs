// ==========================================
// 劳动力市场转型看板 - 柱间连接线
// ==========================================
// 职责: 在相邻的非零柱体之间生成水平虚线
// 规则:
// - 从第一根非零柱开始,跳过连续的零值柱,直接连到下一根非零柱
// - 最后一根柱即使为零也要收尾连接
// - 两端至少一端非零才输出
// - y: Right 方向取起点柱 base,其余方向取起点柱 base + value
// ==========================================

use crate::domain::chart::ConnectorSegment;
use crate::domain::segment::{CascadeDataset, ChartSegment};
use crate::domain::types::StackDirection;

/// 默认半柱宽（横轴单位）
pub const DEFAULT_CONNECTOR_INSET: f64 = 0.3;

// ==========================================
// ConnectorRouter - 连接线路由
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorRouter {
    inset: f64,
}

impl Default for ConnectorRouter {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTOR_INSET)
    }
}

impl ConnectorRouter {
    pub fn new(inset: f64) -> Self {
        Self { inset }
    }

    fn anchor_y(direction: StackDirection, start: &ChartSegment) -> f64 {
        match direction {
            StackDirection::Right => start.base,
            StackDirection::Left | StackDirection::Anchored => start.base + start.value,
        }
    }

    /// 为单块面板生成连接线
    pub fn route(&self, dataset: &CascadeDataset) -> Vec<ConnectorSegment> {
        let segments = &dataset.segments;
        let Some(first) = segments.iter().position(|s| !s.is_zero()) else {
            return Vec::new();
        };

        let last_index = segments.len() - 1;
        let mut start = first;
        let mut lines = Vec::new();

        for (i, end) in segments.iter().enumerate().skip(first + 1) {
            if end.is_zero() && i != last_index {
                continue;
            }

            let from = &segments[start];
            if !from.is_zero() || !end.is_zero() {
                let y = Self::anchor_y(dataset.direction, from);
                lines.push(ConnectorSegment {
                    from_ordinal: from.ordinal,
                    to_ordinal: end.ordinal,
                    x_start: f64::from(from.ordinal) + self.inset,
                    x_end: f64::from(end.ordinal) - self.inset,
                    y,
                });
            }
            start = i;
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::{SegmentDraft, SegmentId};
    use crate::domain::types::{PanelKind, SegmentCategory};
    use crate::engine::cascade::CascadeBuilder;

    fn dataset(panel: PanelKind, values: &[f64]) -> CascadeDataset {
        let drafts: Vec<SegmentDraft> = values
            .iter()
            .enumerate()
            .map(|(i, v)| SegmentDraft::plain(format!("s{}", i), *v))
            .collect();
        let segments = CascadeBuilder::new(20.0).process(panel.stack_direction(), &drafts);
        CascadeDataset::new(panel, segments)
    }

    #[test]
    fn test_skips_zero_run() {
        let lines = ConnectorRouter::default().route(&dataset(PanelKind::Supply, &[100.0, 0.0, 0.0, 50.0]));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].from_ordinal, 1);
        assert_eq!(lines[0].to_ordinal, 4);
        assert_eq!(lines[0].y, 100.0);
        assert!((lines[0].x_start - 1.3).abs() < 1e-12);
        assert!((lines[0].x_end - 3.7).abs() < 1e-12);
    }

    fn segment(direction: StackDirection, index: usize, value: f64, base: f64) -> ChartSegment {
        ChartSegment {
            id: SegmentId { direction, index },
            name: format!("s{}", index),
            value,
            display_value: value,
            ordinal: index as u32 + 1,
            base,
            running_total: base + value,
            category: SegmentCategory::Plain,
            footnote: None,
        }
    }

    #[test]
    fn test_skips_zero_run_on_small_values() {
        // 低于阈值的值在堆叠时会被归零,这里直接构造柱体
        let dir = StackDirection::Left;
        let ds = CascadeDataset::new(
            PanelKind::Supply,
            vec![
                segment(dir, 0, 10.0, 0.0),
                segment(dir, 1, 0.0, 10.0),
                segment(dir, 2, 0.0, 10.0),
                segment(dir, 3, 5.0, 10.0),
            ],
        );

        let lines = ConnectorRouter::default().route(&ds);
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].from_ordinal, lines[0].to_ordinal), (1, 4));
        assert_eq!(lines[0].y, 10.0);
        assert!((lines[0].x_start - 1.3).abs() < 1e-12);
        assert!((lines[0].x_end - 3.7).abs() < 1e-12);
    }

    #[test]
    fn test_closes_chain_to_zero_final_bar() {
        let lines = ConnectorRouter::default().route(&dataset(PanelKind::Supply, &[100.0, 50.0, 0.0]));
        let pairs: Vec<(u32, u32)> = lines.iter().map(|l| (l.from_ordinal, l.to_ordinal)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
        assert_eq!(lines[1].y, 150.0);
    }

    #[test]
    fn test_right_stacking_uses_base() {
        let ds = dataset(PanelKind::Demand, &[0.0, 25.0, 0.0, 60.0, 1000.0]);
        let lines = ConnectorRouter::default().route(&ds);
        let pairs: Vec<(u32, u32)> = lines.iter().map(|l| (l.from_ordinal, l.to_ordinal)).collect();
        assert_eq!(pairs, vec![(2, 4), (4, 5)]);
        // 起点柱 2: base = 60 + 1000
        assert_eq!(lines[0].y, 1060.0);
        assert_eq!(lines[1].y, 1000.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let router = ConnectorRouter::default();
        assert!(router.route(&dataset(PanelKind::Supply, &[])).is_empty());
        assert!(router.route(&dataset(PanelKind::Supply, &[500.0])).is_empty());
        assert!(router.route(&dataset(PanelKind::Supply, &[0.0, 0.0, 0.0])).is_empty());
    }

    #[test]
    fn test_custom_inset() {
        let lines = ConnectorRouter::new(0.2).route(&dataset(PanelKind::Supply, &[100.0, 50.0]));
        assert!((lines[0].x_start - 1.2).abs() < 1e-12);
        assert!((lines[0].x_end - 1.8).abs() < 1e-12);
    }
}
