// ==========================================
// 劳动力市场转型看板 - 引擎层错误类型
// ==========================================
// 职责: 单块面板计算失败的原因（其余面板不受影响）
// ==========================================

use crate::domain::types::PanelKind;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("指标字段非有限值: panel={panel}, field={field}, value={value}")]
    NonFiniteMetric {
        panel: PanelKind,
        field: &'static str,
        value: f64,
    },
}

/// Result 类型别名
pub type ChartResult<T> = Result<T, ChartError>;
