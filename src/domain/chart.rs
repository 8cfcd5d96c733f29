// ==========================================
// 劳动力市场转型看板 - 坐标轴与连接线模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DomainSource - 纵轴范围来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainSource {
    AutoFit,           // 按数据自动取整
    AggregateOverride, // 汇总行固定窗口
    Fallback,          // 无可用数据时的兜底范围
}

// ==========================================
// AxisDomain - 三块面板共享的纵轴范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
    pub source: DomainSource,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64, source: DomainSource) -> Self {
        Self { min, max, source }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.min && y <= self.max
    }
}

// ==========================================
// ConnectorSegment - 柱间虚线连接
// ==========================================
// 水平线: 起点和终点 y 相同
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSegment {
    pub from_ordinal: u32,
    pub to_ordinal: u32,
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
}
