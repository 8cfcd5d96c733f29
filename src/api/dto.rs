// ==========================================
// 劳动力市场转型看板 - 展示层数据传输对象
// ==========================================
// 职责: 一次职业选择的完整计算结果（可序列化,交给渲染适配层）
// 生命周期: 每次 select 重新生成,生成后只读
// ==========================================

use crate::domain::chart::{AxisDomain, ConnectorSegment};
use crate::domain::segment::{CascadeDataset, Footnote};
use crate::domain::types::PanelKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ==========================================
// PanelOutcome - 单块面板的计算结果
// ==========================================
// 某块面板失败时其余面板照常渲染
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelOutcome {
    Ready {
        dataset: CascadeDataset,
        connectors: Vec<ConnectorSegment>,
    },
    Failed {
        panel: PanelKind,
        reason: String,
    },
}

impl PanelOutcome {
    pub fn panel(&self) -> PanelKind {
        match self {
            PanelOutcome::Ready { dataset, .. } => dataset.panel,
            PanelOutcome::Failed { panel, .. } => *panel,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PanelOutcome::Ready { .. })
    }

    pub fn dataset(&self) -> Option<&CascadeDataset> {
        match self {
            PanelOutcome::Ready { dataset, .. } => Some(dataset),
            PanelOutcome::Failed { .. } => None,
        }
    }

    pub fn connectors(&self) -> &[ConnectorSegment] {
        match self {
            PanelOutcome::Ready { connectors, .. } => connectors,
            PanelOutcome::Failed { .. } => &[],
        }
    }
}

// ==========================================
// WaterfallView - 三联瀑布图视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallView {
    pub view_id: Uuid,                    // 每次计算新生成
    pub occupation: String,               // 选中的职业
    pub locale: String,                   // 标签语言
    pub generated_at: DateTime<Utc>,      // 生成时间
    pub supply: PanelOutcome,             // 供给面板
    pub gap: PanelOutcome,                // 缺口面板
    pub demand: PanelOutcome,             // 需求面板
    pub domain: AxisDomain,               // 共享纵轴
    pub ticks: Vec<f64>,                  // 刻度位置
    pub waterfall_minimum: Option<f64>,   // 最低可见点（用于检测裁切）
    pub footnotes: Vec<Footnote>,         // 合并去重后的脚注（按编号）
}

impl WaterfallView {
    pub fn panel(&self, kind: PanelKind) -> &PanelOutcome {
        match kind {
            PanelKind::Supply => &self.supply,
            PanelKind::Gap => &self.gap,
            PanelKind::Demand => &self.demand,
        }
    }

    /// 按展示顺序（供给 / 缺口 / 需求）
    pub fn panels(&self) -> [&PanelOutcome; 3] {
        [&self.supply, &self.gap, &self.demand]
    }

    /// 最低可见点是否低于纵轴下限
    pub fn is_clipped(&self) -> bool {
        self.waterfall_minimum
            .map_or(false, |min| min < self.domain.min)
    }
}

// ==========================================
// WaterfallState - 展示状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaterfallState {
    Ready(WaterfallView),
    NoData { occupation: String, message: String },
}

impl WaterfallState {
    pub fn view(&self) -> Option<&WaterfallView> {
        match self {
            WaterfallState::Ready(view) => Some(view),
            WaterfallState::NoData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.view().is_some()
    }
}
