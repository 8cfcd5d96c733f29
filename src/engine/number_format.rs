// ==========================================
// 劳动力市场转型看板 - 数值格式化
// ==========================================
// 职责: 柱体标签/刻度/提示框的紧凑数字格式（K/M 后缀）
// 红线: 任何有限输入都必须返回字符串,不 panic
// ==========================================

use crate::config::waterfall_config::DEFAULT_NOISE_FLOOR;

/// 小值归零: |value| < noise_floor → 0
///
/// 幂等: suppress(suppress(v)) == suppress(v)
pub fn suppress_small(value: f64, noise_floor: f64) -> f64 {
    if value.abs() < noise_floor {
        0.0
    } else {
        value
    }
}

/// 取整后再做小值归零（数据映射统一入口）
pub fn round_and_suppress(value: f64, noise_floor: f64) -> f64 {
    suppress_small(value.round(), noise_floor)
}

/// 对非负整数串插入千位分隔符
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

// ==========================================
// NumberFormatter - 紧凑数字格式化
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberFormatter {
    noise_floor: f64,
    thousands_separator: char,
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_FLOOR, '.')
    }
}

impl NumberFormatter {
    pub fn new(noise_floor: f64, thousands_separator: char) -> Self {
        Self {
            noise_floor,
            thousands_separator,
        }
    }

    /// 按语言创建
    pub fn for_locale(noise_floor: f64, locale: &str) -> Self {
        Self::new(noise_floor, crate::i18n::thousands_separator(locale))
    }

    /// 紧凑格式
    ///
    /// 规则:
    /// - |v| < noise_floor → "0"
    /// - |v| ≥ 1,000,000 → 一位小数 + "M"
    /// - |v| ≥ 1,000 → 整数 + "K"
    /// - 其余 → 带千位分隔的整数
    /// - 负数前缀 "-",零不带符号;舍入规则为四舍五入（远离零）
    pub fn format(&self, value: f64) -> String {
        let v = suppress_small(value, self.noise_floor);
        if v == 0.0 || !v.is_finite() {
            return "0".to_string();
        }

        let abs = v.abs();
        let body = if abs >= 1_000_000.0 {
            let tenths = (abs / 100_000.0).round();
            format!("{}.{}M", (tenths / 10.0).trunc(), tenths % 10.0)
        } else if abs >= 1_000.0 {
            format!("{}K", (abs / 1_000.0).round())
        } else {
            let rounded = abs.round();
            if rounded == 0.0 {
                return "0".to_string();
            }
            group_digits(&format!("{}", rounded), self.thousands_separator)
        };

        if v < 0.0 {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// 完整整数格式（不做 K/M 压缩,不做小值归零）
    pub fn format_grouped(&self, value: f64) -> String {
        if !value.is_finite() {
            return "0".to_string();
        }
        let rounded = value.round();
        if rounded == 0.0 {
            return "0".to_string();
        }
        let grouped = group_digits(&format!("{}", rounded.abs()), self.thousands_separator);
        if rounded < 0.0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nl() -> NumberFormatter {
        NumberFormatter::new(20.0, '.')
    }

    #[test]
    fn test_small_values_render_as_zero() {
        let f = nl();
        assert_eq!(f.format(0.0), "0");
        assert_eq!(f.format(19.9), "0");
        assert_eq!(f.format(-19.9), "0");
        assert_eq!(f.format(-0.0), "0");
    }

    #[test]
    fn test_plain_values() {
        let f = nl();
        assert_eq!(f.format(20.0), "20");
        assert_eq!(f.format(-250.0), "-250");
        assert_eq!(f.format(999.4), "999");
    }

    #[test]
    fn test_thousands() {
        let f = nl();
        assert_eq!(f.format(1_000.0), "1K");
        assert_eq!(f.format(1_500.0), "2K");
        assert_eq!(f.format(2_500.0), "3K");
        assert_eq!(f.format(-45_200.0), "-45K");
        assert_eq!(f.format(999_999.0), "1000K");
    }

    #[test]
    fn test_millions() {
        let f = nl();
        assert_eq!(f.format(1_000_000.0), "1.0M");
        assert_eq!(f.format(6_250_000.0), "6.3M");
        assert_eq!(f.format(11_000_000.0), "11.0M");
        assert_eq!(f.format(-2_340_000.0), "-2.3M");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(nl().format_grouped(1_234_567.0), "1.234.567");
        assert_eq!(NumberFormatter::new(20.0, ',').format_grouped(-9_876.4), "-9,876");
        assert_eq!(nl().format_grouped(12.0), "12");
        assert_eq!(nl().format_grouped(0.2), "0");
    }

    #[test]
    fn test_suppression_is_idempotent() {
        for v in [-1000.0, -20.0, -19.99, -5.0, 0.0, 7.0, 19.0, 20.0, 35.5, 1e6] {
            let once = suppress_small(v, 20.0);
            assert_eq!(suppress_small(once, 20.0), once);
        }
    }

    #[test]
    fn test_round_and_suppress() {
        assert_eq!(round_and_suppress(19.6, 20.0), 20.0);
        assert_eq!(round_and_suppress(19.4, 20.0), 0.0);
        assert_eq!(round_and_suppress(-30.2, 20.0), -30.0);
    }
}
