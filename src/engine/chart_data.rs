// ==========================================
// 劳动力市场转型看板 - 指标 → 柱体草稿映射
// ==========================================
// 职责: 把单个职业的 WorkforceMetrics 映射为三组有序增量
// - 供给: [2024 供给, 至 2035 净流入]
// - 需求: [生产率, 扩张, 收缩, 空缺(脚注 2), 2024 已填补需求]（倒叙,生产率在前）
// - 缺口: [2035 供给, -(过剩 - 转出)(脚注 1), 转入, 剩余缺口, 2035 需求]
// 红线:
// - 全部数值先取整,再做 |v| < 阈值 → 0,之后才参与任何累计
// - 缺口面板逐字段套用固定公式,不从供需总量反推（允许不平衡）
// ==========================================

use crate::domain::metrics::WorkforceMetrics;
use crate::domain::segment::{Footnote, SegmentDraft};
use crate::domain::types::{PanelKind, SegmentCategory};
use crate::engine::error::{ChartError, ChartResult};
use crate::engine::number_format::round_and_suppress;
use crate::i18n;

/// "过剩人员"定义的脚注编号
pub const FOOTNOTE_SUPERFLUOUS: u32 = 1;

/// "2% 摩擦性失业"说明的脚注编号
pub const FOOTNOTE_FRICTIONAL: u32 = 2;

const SUPPLY_FIELDS: [&str; 2] = ["labor_supply", "net_labor_change"];

const DEMAND_FIELDS: [&str; 5] = [
    "productivity",
    "expansion_demand",
    "reduction_demand",
    "vacancies",
    "labor_supply",
];

// ==========================================
// ChartDataMapper - 指标映射器
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataMapper {
    noise_floor: f64,
    locale: String,
}

impl ChartDataMapper {
    pub fn new(noise_floor: f64, locale: impl Into<String>) -> Self {
        Self {
            noise_floor,
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn label(&self, key: &str) -> String {
        i18n::t_in(&self.locale, key)
    }

    fn clean(&self, value: f64) -> f64 {
        round_and_suppress(value, self.noise_floor)
    }

    /// 检查面板用到的字段均为有限值
    fn ensure_finite(
        panel: PanelKind,
        metrics: &WorkforceMetrics,
        fields: &[&'static str],
    ) -> ChartResult<()> {
        for &field in fields {
            if let Some(value) = metrics.field(field) {
                if !value.is_finite() {
                    return Err(ChartError::NonFiniteMetric {
                        panel,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// 按面板分派
    pub fn drafts_for(
        &self,
        panel: PanelKind,
        metrics: &WorkforceMetrics,
    ) -> ChartResult<Vec<SegmentDraft>> {
        match panel {
            PanelKind::Supply => self.supply_data(metrics),
            PanelKind::Demand => self.demand_data(metrics),
            PanelKind::Gap => self.gap_data(metrics),
        }
    }

    /// 供给面板
    pub fn supply_data(&self, m: &WorkforceMetrics) -> ChartResult<Vec<SegmentDraft>> {
        Self::ensure_finite(PanelKind::Supply, m, &SUPPLY_FIELDS)?;

        Ok(vec![
            SegmentDraft::plain(
                self.label("segment.supply.labor_supply"),
                self.clean(m.labor_supply),
            ),
            SegmentDraft::plain(
                self.label("segment.supply.net_change"),
                self.clean(m.net_labor_change),
            ),
        ])
    }

    /// 需求面板
    pub fn demand_data(&self, m: &WorkforceMetrics) -> ChartResult<Vec<SegmentDraft>> {
        Self::ensure_finite(PanelKind::Demand, m, &DEMAND_FIELDS)?;

        Ok(vec![
            SegmentDraft::plain(
                self.label("segment.demand.productivity"),
                self.clean(m.productivity),
            ),
            SegmentDraft::plain(
                self.label("segment.demand.expansion"),
                self.clean(m.expansion_demand),
            ),
            SegmentDraft::plain(
                self.label("segment.demand.reduction"),
                self.clean(m.reduction_demand),
            ),
            SegmentDraft::plain(self.label("segment.demand.vacancies"), self.clean(m.vacancies))
                .with_footnote(Footnote::new(
                    FOOTNOTE_FRICTIONAL,
                    self.label("footnote.frictional"),
                )),
            SegmentDraft::plain(self.label("segment.demand.filled"), self.clean(m.labor_supply)),
        ])
    }

    /// 缺口面板
    ///
    /// base 按已归零的值逐步累计:
    /// - 第 2 根: 第 1 根之后
    /// - 第 3 根: 第 2 根之后
    /// - 第 4 根: 第 3 根之后
    /// - 首尾两根终值柱 base = 0
    pub fn gap_data(&self, m: &WorkforceMetrics) -> ChartResult<Vec<SegmentDraft>> {
        Self::ensure_finite(PanelKind::Gap, m, &WorkforceMetrics::FIELD_NAMES)?;

        let total_supply = self.clean(m.total_supply());
        let excess = self.clean(-m.superfluous_after_transitions().round());
        let transitions_in = self.clean(m.transitions_in);
        let shortage = self.clean(m.shortage);
        let total_demand = self.clean(m.total_demand());

        let after_excess = total_supply + excess;
        let after_transitions = after_excess + transitions_in;

        Ok(vec![
            SegmentDraft::plain(self.label("segment.gap.total_supply"), total_supply)
                .with_category(SegmentCategory::FinalProjection)
                .with_base(0.0),
            SegmentDraft::plain(self.label("segment.gap.excess"), excess)
                .with_category(SegmentCategory::ExcessWorkers)
                .with_footnote(Footnote::new(
                    FOOTNOTE_SUPERFLUOUS,
                    self.label("footnote.superfluous"),
                ))
                .with_base(total_supply),
            SegmentDraft::plain(self.label("segment.gap.transitions"), transitions_in)
                .with_category(SegmentCategory::ShortageReduction)
                .with_base(after_excess),
            SegmentDraft::plain(self.label("segment.gap.shortage"), shortage)
                .with_category(SegmentCategory::Shortage)
                .with_base(after_transitions),
            SegmentDraft::plain(self.label("segment.gap.total_demand"), total_demand)
                .with_category(SegmentCategory::FinalProjection)
                .with_base(0.0),
        ])
    }
}
