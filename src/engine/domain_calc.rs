// ==========================================
// 劳动力市场转型看板 - 纵轴范围计算
// ==========================================
// 职责: 三块面板共享同一纵轴范围
// - 汇总行: 固定窗口（与数据无关）
// - 其他: [0, round_up_to_nice(M, determine_increment(M))], M = max(base + value)
// - 无可用面板或 M ≤ 0: [0, MIN_INCREMENT]
// ==========================================

use crate::config::waterfall_config::WaterfallConfig;
use crate::domain::chart::{AxisDomain, DomainSource};
use crate::domain::segment::CascadeDataset;
use crate::engine::scale::{ScaleAnalyzer, MIN_INCREMENT};

// ==========================================
// DomainCalculator - 纵轴范围计算器
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct DomainCalculator {
    scale: ScaleAnalyzer,
    aggregate_key: String,
    aggregate_window: (f64, f64),
}

impl DomainCalculator {
    pub fn new(scale: ScaleAnalyzer, aggregate_key: impl Into<String>, aggregate_window: (f64, f64)) -> Self {
        Self {
            scale,
            aggregate_key: aggregate_key.into(),
            aggregate_window,
        }
    }

    /// 由配置创建
    pub fn from_config(config: &WaterfallConfig) -> Self {
        Self::new(
            ScaleAnalyzer::new(config.max_tick_count, config.headroom_factor),
            config.aggregate_key.clone(),
            config.aggregate_domain(),
        )
    }

    pub fn scale(&self) -> &ScaleAnalyzer {
        &self.scale
    }

    pub fn is_aggregate(&self, occupation: &str) -> bool {
        occupation == self.aggregate_key
    }

    /// 计算共享纵轴范围
    ///
    /// # 参数
    /// - occupation: 当前选中的职业
    /// - panels: 计算成功的面板（失败面板不参与）
    pub fn calculate(&self, occupation: &str, panels: &[&CascadeDataset]) -> AxisDomain {
        if self.is_aggregate(occupation) {
            let (min, max) = self.aggregate_window;
            return AxisDomain::new(min, max, DomainSource::AggregateOverride);
        }

        let max_top = panels
            .iter()
            .filter_map(|p| p.max_top())
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        match max_top {
            Some(m) if m > 0.0 => {
                let increment = self.scale.determine_increment(m);
                let max = self.scale.round_up_to_nice(m, increment);
                AxisDomain::new(0.0, max, DomainSource::AutoFit)
            }
            _ => AxisDomain::new(0.0, MIN_INCREMENT, DomainSource::Fallback),
        }
    }

    /// 所有柱体的最低可见点
    ///
    /// 正值柱取 base,负值柱取 base + value;无柱体时返回 None
    pub fn waterfall_minimum(&self, panels: &[&CascadeDataset]) -> Option<f64> {
        panels
            .iter()
            .flat_map(|p| p.segments.iter())
            .map(|s| s.lowest_point())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
    }
}

impl Default for DomainCalculator {
    fn default() -> Self {
        Self::from_config(&WaterfallConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::SegmentDraft;
    use crate::domain::types::PanelKind;
    use crate::engine::cascade::CascadeBuilder;

    fn dataset(panel: PanelKind, values: &[f64]) -> CascadeDataset {
        let drafts: Vec<SegmentDraft> = values
            .iter()
            .map(|v| SegmentDraft::plain("x", *v))
            .collect();
        let segments = CascadeBuilder::new(20.0).process(panel.stack_direction(), &drafts);
        CascadeDataset::new(panel, segments)
    }

    #[test]
    fn test_auto_fit_domain() {
        let calc = DomainCalculator::default();
        let supply = dataset(PanelKind::Supply, &[1000.0, 50.0]);
        let demand = dataset(PanelKind::Demand, &[0.0, 25.0, 0.0, 40.0, 1000.0]);

        let domain = calc.calculate("Verpleegkundigen", &[&supply, &demand]);
        assert_eq!(domain.source, DomainSource::AutoFit);
        assert_eq!(domain.min, 0.0);
        // M = 1065 → 步长 200 → 1200
        assert_eq!(domain.max, 1200.0);
    }

    #[test]
    fn test_aggregate_override_ignores_data() {
        let calc = DomainCalculator::default();
        let supply = dataset(PanelKind::Supply, &[1000.0, 50.0]);

        let domain = calc.calculate("Totaal", &[&supply]);
        assert_eq!(domain.source, DomainSource::AggregateOverride);
        assert_eq!((domain.min, domain.max), (6_000_000.0, 11_000_000.0));

        let empty = calc.calculate("Totaal", &[]);
        assert_eq!((empty.min, empty.max), (6_000_000.0, 11_000_000.0));
    }

    #[test]
    fn test_fallback_without_positive_data() {
        let calc = DomainCalculator::default();
        let none = calc.calculate("Leraren", &[]);
        assert_eq!(none.source, DomainSource::Fallback);
        assert_eq!((none.min, none.max), (0.0, MIN_INCREMENT));

        let negative = dataset(PanelKind::Supply, &[-500.0, -100.0]);
        let domain = calc.calculate("Leraren", &[&negative]);
        assert_eq!(domain.source, DomainSource::Fallback);
        assert!(domain.max.is_finite());
    }

    #[test]
    fn test_domain_covers_every_top() {
        let calc = DomainCalculator::default();
        for values in [[120.0, 30.0], [5_432.0, 2_100.0], [987_654.0, -40_000.0]] {
            let ds = dataset(PanelKind::Supply, &values);
            let domain = calc.calculate("x", &[&ds]);
            for s in &ds.segments {
                assert!(domain.contains(s.top()), "top {} outside {:?}", s.top(), domain);
            }
        }
    }

    #[test]
    fn test_waterfall_minimum() {
        let calc = DomainCalculator::default();
        let supply = dataset(PanelKind::Supply, &[1000.0, -300.0]);
        let demand = dataset(PanelKind::Demand, &[100.0, 500.0]);

        assert_eq!(calc.waterfall_minimum(&[&supply, &demand]), Some(0.0));
        let high = dataset(PanelKind::Supply, &[0.0]);
        assert_eq!(calc.waterfall_minimum(&[&high]), Some(0.0));
        assert_eq!(calc.waterfall_minimum(&[]), None);

        let gap = CascadeDataset::new(
            PanelKind::Gap,
            CascadeBuilder::new(20.0).process_anchored(&[
                SegmentDraft::plain("a", -30.0).with_base(1050.0),
                SegmentDraft::plain("b", 30.0).with_base(1020.0),
            ]),
        );
        assert_eq!(calc.waterfall_minimum(&[&gap]), Some(1020.0));
    }
}
