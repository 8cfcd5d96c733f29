// ==========================================
// 劳动力市场转型看板 - 职业劳动力指标
// ==========================================
// 职责: 单个职业的 2024→2035 预计算指标（只读输入）
// 红线: 字段间不强制任何代数关系（供需总量允许不平衡）
// ==========================================

use serde::{Deserialize, Serialize};
use std::ops::Add;

// ==========================================
// WorkforceMetrics - 职业劳动力指标
// ==========================================
// 单位: 人数（部分字段为百分点）,均为有符号实数
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkforceMetrics {
    pub labor_supply: f64,        // 2024 劳动力供给
    pub net_labor_change: f64,    // 至 2035 净流入
    pub transitions_in: f64,      // 转岗流入
    pub transitions_out: f64,     // 转岗流出
    pub superfluous_workers: f64, // 过剩人员
    pub shortage: f64,            // 剩余缺口
    pub productivity: f64,        // 生产率驱动的需求变化
    pub expansion_demand: f64,    // 扩张需求
    pub reduction_demand: f64,    // 收缩需求
    pub vacancies: f64,           // 摩擦线以上的空缺
}

impl WorkforceMetrics {
    /// 全部字段名（与序列化字段一致）
    pub const FIELD_NAMES: [&'static str; 10] = [
        "labor_supply",
        "net_labor_change",
        "transitions_in",
        "transitions_out",
        "superfluous_workers",
        "shortage",
        "productivity",
        "expansion_demand",
        "reduction_demand",
        "vacancies",
    ];

    /// 按字段名读取值
    pub fn field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "labor_supply" => self.labor_supply,
            "net_labor_change" => self.net_labor_change,
            "transitions_in" => self.transitions_in,
            "transitions_out" => self.transitions_out,
            "superfluous_workers" => self.superfluous_workers,
            "shortage" => self.shortage,
            "productivity" => self.productivity,
            "expansion_demand" => self.expansion_demand,
            "reduction_demand" => self.reduction_demand,
            "vacancies" => self.vacancies,
            _ => return None,
        };
        Some(value)
    }

    /// 2035 年劳动力供给
    pub fn total_supply(&self) -> f64 {
        self.labor_supply + self.net_labor_change
    }

    /// 2035 年劳动力需求
    pub fn total_demand(&self) -> f64 {
        self.labor_supply
            + self.vacancies
            + self.expansion_demand
            + self.reduction_demand
            + self.productivity
    }

    /// 扣除转岗流出后仍然过剩的人数
    pub fn superfluous_after_transitions(&self) -> f64 {
        self.superfluous_workers - self.transitions_out
    }
}

impl Add for WorkforceMetrics {
    type Output = WorkforceMetrics;

    fn add(self, rhs: WorkforceMetrics) -> WorkforceMetrics {
        WorkforceMetrics {
            labor_supply: self.labor_supply + rhs.labor_supply,
            net_labor_change: self.net_labor_change + rhs.net_labor_change,
            transitions_in: self.transitions_in + rhs.transitions_in,
            transitions_out: self.transitions_out + rhs.transitions_out,
            superfluous_workers: self.superfluous_workers + rhs.superfluous_workers,
            shortage: self.shortage + rhs.shortage,
            productivity: self.productivity + rhs.productivity,
            expansion_demand: self.expansion_demand + rhs.expansion_demand,
            reduction_demand: self.reduction_demand + rhs.reduction_demand,
            vacancies: self.vacancies + rhs.vacancies,
        }
    }
}

impl std::iter::Sum for WorkforceMetrics {
    fn sum<I: Iterator<Item = WorkforceMetrics>>(iter: I) -> Self {
        iter.fold(WorkforceMetrics::default(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorkforceMetrics {
        WorkforceMetrics {
            labor_supply: 1000.0,
            net_labor_change: 50.0,
            transitions_in: 30.0,
            transitions_out: 10.0,
            superfluous_workers: 40.0,
            shortage: 20.0,
            productivity: -15.0,
            expansion_demand: 25.0,
            reduction_demand: -5.0,
            vacancies: 60.0,
        }
    }

    #[test]
    fn test_derived_totals() {
        let m = sample();
        assert_eq!(m.total_supply(), 1050.0);
        assert_eq!(m.total_demand(), 1065.0);
        assert_eq!(m.superfluous_after_transitions(), 30.0);
    }

    #[test]
    fn test_sum_is_field_wise() {
        let total: WorkforceMetrics = vec![sample(), sample()].into_iter().sum();
        assert_eq!(total.labor_supply, 2000.0);
        assert_eq!(total.productivity, -30.0);
        assert_eq!(total.vacancies, 120.0);
    }

    #[test]
    fn test_field_lookup() {
        let m = sample();
        assert_eq!(m.field("shortage"), Some(20.0));
        assert_eq!(m.field("vacancies"), Some(60.0));
        assert_eq!(m.field("onbekend"), None);
    }

    #[test]
    fn test_deserialize_snake_case_fields() {
        let json = r#"{
            "labor_supply": 1000, "net_labor_change": 50, "transitions_in": 30,
            "transitions_out": 10, "superfluous_workers": 40, "shortage": 20,
            "productivity": -15, "expansion_demand": 25, "reduction_demand": -5,
            "vacancies": 60
        }"#;
        let m: WorkforceMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(m, sample());
    }
}
