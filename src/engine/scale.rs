// ==========================================
// 劳动力市场转型看板 - 刻度分析
// ==========================================
// 职责: 为给定最大值挑选"整齐"的刻度步长,并计算取整后的纵轴上限
// 红线: max ≤ 0 或非有限输入不得产生 NaN / -∞,直接回退到最小步长
// ==========================================

use crate::domain::chart::AxisDomain;

/// 最小默认步长
pub const MIN_INCREMENT: f64 = 5.0;

/// 小量程阈值: 低于该值使用固定步长 5 / 10
const SMALL_SCALE_LIMIT: f64 = 100.0;

/// 刻度数组长度上限（防御异常步长导致的死循环）
const MAX_TICKS_EMITTED: usize = 1_000;

// ==========================================
// ScaleAnalyzer - 刻度分析器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAnalyzer {
    max_tick_count: f64,
    headroom_factor: f64,
}

impl Default for ScaleAnalyzer {
    fn default() -> Self {
        Self::new(8, 1.2)
    }
}

impl ScaleAnalyzer {
    pub fn new(max_tick_count: u32, headroom_factor: f64) -> Self {
        Self {
            max_tick_count: f64::from(max_tick_count.max(1)),
            headroom_factor,
        }
    }

    /// 10 的整数次幂,不超过 value
    ///
    /// log10 在整 10 次幂附近可能差一个 ulp,这里做上下修正
    fn magnitude(value: f64) -> f64 {
        let mut exponent = value.log10().floor() as i32;
        if 10f64.powi(exponent + 1) <= value {
            exponent += 1;
        } else if 10f64.powi(exponent) > value {
            exponent -= 1;
        }
        10f64.powi(exponent)
    }

    /// 选择刻度步长
    ///
    /// 规则:
    /// - max 非有限或 ≤ 0 → MIN_INCREMENT
    /// - max < 100 → max ≤ 50 取 5,否则取 10
    /// - 否则在 {m/5, m/2, m, 2m, 5m} 中取第一个使 max / c ≤ 刻度上限 的候选,均不满足时取 m
    pub fn determine_increment(&self, max_value: f64) -> f64 {
        if !max_value.is_finite() || max_value <= 0.0 {
            return MIN_INCREMENT;
        }

        if max_value < SMALL_SCALE_LIMIT {
            return if max_value <= 50.0 { 5.0 } else { 10.0 };
        }

        let magnitude = Self::magnitude(max_value);
        [
            magnitude / 5.0,
            magnitude / 2.0,
            magnitude,
            magnitude * 2.0,
            magnitude * 5.0,
        ]
        .into_iter()
        .find(|inc| max_value / inc <= self.max_tick_count)
        .unwrap_or(magnitude)
    }

    /// 向上取整到步长的整数倍,但不超过 value × headroom_factor
    pub fn round_up_to_nice(&self, value: f64, increment: f64) -> f64 {
        if !value.is_finite() || !increment.is_finite() || increment <= 0.0 {
            return value;
        }
        let raw_rounded = (value / increment).ceil() * increment;
        let max_allowed = value * self.headroom_factor;
        raw_rounded.min(max_allowed)
    }

    /// 生成显式刻度数组
    ///
    /// - 步长 = determine_increment(max - min)
    /// - 起点 = floor(min / 步长) × 步长,逐个输出 ≤ max 的刻度
    /// - 若最后一个刻度仍低于 max,再补一个收尾刻度（位于 max 之上）
    pub fn tick_positions(&self, domain: &AxisDomain) -> Vec<f64> {
        if !domain.min.is_finite() || !domain.max.is_finite() || domain.max < domain.min {
            return Vec::new();
        }

        let increment = self.determine_increment(domain.span());
        let start = (domain.min / increment).floor() * increment;

        let mut ticks = Vec::new();
        let mut k = 0usize;
        loop {
            let tick = start + increment * k as f64;
            if tick > domain.max || ticks.len() >= MAX_TICKS_EMITTED {
                break;
            }
            ticks.push(tick);
            k += 1;
        }

        match ticks.last() {
            Some(&last) if last < domain.max => ticks.push(last + increment),
            None => ticks.push(start),
            _ => {}
        }

        ticks
    }
}
