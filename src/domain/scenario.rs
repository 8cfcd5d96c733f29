// ==========================================
// 劳动力市场转型看板 - 情景键
// ==========================================
// 职责: 模型情景参数 <-> 数据集键 的编码与解析
// 格式: {productivity:.1}-{steering}-{work_hours}-{job_priority}-{non_source_jobs}
// 示例: 1.0-with-standard-standard-standard
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 情景键解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioKeyError {
    #[error("情景键段数错误: key={key}, 期望 5 段")]
    WrongSegmentCount { key: String },

    #[error("生产率取值无效: {0}")]
    InvalidProductivity(String),

    #[error("政府引导取值无效: {0}（应为 with/without）")]
    InvalidSteering(String),

    #[error("情景键字段为空: {0}")]
    EmptyField(&'static str),
}

// ==========================================
// 政府引导 (Government Steering)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Steering {
    With,
    Without,
}

impl fmt::Display for Steering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Steering::With => write!(f, "with"),
            Steering::Without => write!(f, "without"),
        }
    }
}

// ==========================================
// ScenarioKey - 模型情景
// ==========================================
// 生产率在构造时按一位小数、0.5 远离零取整（0.25 → 0.3,-0.25 → -0.3）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ScenarioKey {
    productivity: f64,
    steering: Steering,
    work_hours: String,
    job_priority: String,
    non_source_jobs: String,
}

/// 按一位小数取整,0.5 远离零
fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // 避免编码出 "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl ScenarioKey {
    pub fn new(
        productivity: f64,
        steering: Steering,
        work_hours: impl Into<String>,
        job_priority: impl Into<String>,
        non_source_jobs: impl Into<String>,
    ) -> Self {
        Self {
            productivity: round_to_tenth(productivity),
            steering,
            work_hours: work_hours.into(),
            job_priority: job_priority.into(),
            non_source_jobs: non_source_jobs.into(),
        }
    }

    pub fn productivity(&self) -> f64 {
        self.productivity
    }

    pub fn steering(&self) -> Steering {
        self.steering
    }

    pub fn work_hours(&self) -> &str {
        &self.work_hours
    }

    pub fn job_priority(&self) -> &str {
        &self.job_priority
    }

    pub fn non_source_jobs(&self) -> &str {
        &self.non_source_jobs
    }

    /// 编码为数据集键
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// 解析数据集键
    ///
    /// 从右向左切分,生产率允许为负数（如 "-0.5-with-..."）
    pub fn parse(key: &str) -> Result<Self, ScenarioKeyError> {
        let parts: Vec<&str> = key.trim().rsplitn(5, '-').collect();
        if parts.len() != 5 {
            return Err(ScenarioKeyError::WrongSegmentCount {
                key: key.to_string(),
            });
        }

        // rsplitn 逆序返回
        let (non_source_jobs, job_priority, work_hours, steering, productivity) =
            (parts[0], parts[1], parts[2], parts[3], parts[4]);

        let productivity: f64 = productivity
            .parse()
            .map_err(|_| ScenarioKeyError::InvalidProductivity(productivity.to_string()))?;
        if !productivity.is_finite() {
            return Err(ScenarioKeyError::InvalidProductivity(productivity.to_string()));
        }

        let steering = match steering {
            "with" => Steering::With,
            "without" => Steering::Without,
            other => return Err(ScenarioKeyError::InvalidSteering(other.to_string())),
        };

        for (name, value) in [
            ("work_hours", work_hours),
            ("job_priority", job_priority),
            ("non_source_jobs", non_source_jobs),
        ] {
            if value.is_empty() {
                return Err(ScenarioKeyError::EmptyField(name));
            }
        }

        Ok(Self::new(
            productivity,
            steering,
            work_hours,
            job_priority,
            non_source_jobs,
        ))
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}-{}-{}-{}-{}",
            self.productivity, self.steering, self.work_hours, self.job_priority, self.non_source_jobs
        )
    }
}

impl From<ScenarioKey> for String {
    fn from(key: ScenarioKey) -> String {
        key.encode()
    }
}

impl TryFrom<String> for ScenarioKey {
    type Error = ScenarioKeyError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        ScenarioKey::parse(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScenarioKey {
        ScenarioKey::new(1.0, Steering::With, "standard", "standard", "everyone")
    }

    #[test]
    fn test_encode() {
        assert_eq!(sample().encode(), "1.0-with-standard-standard-everyone");
    }

    #[test]
    fn test_parse_normalizes_productivity() {
        let key = ScenarioKey::parse("1.25-without-more-care-none").unwrap();
        assert_eq!(key.steering(), Steering::Without);
        assert_eq!(key.work_hours(), "more");
        assert_eq!(key.job_priority(), "care");
        assert_eq!(key.non_source_jobs(), "none");
        assert_eq!(key.encode(), "1.3-without-more-care-none");
    }

    #[test]
    fn test_parse_negative_productivity() {
        let key = ScenarioKey::parse("-0.5-with-standard-standard-everyone").unwrap();
        assert_eq!(key.productivity(), -0.5);
    }

    #[test]
    fn test_constructor_rounds_half_away_from_zero() {
        let key = ScenarioKey::new(0.25, Steering::With, "standard", "standard", "everyone");
        assert_eq!(key.encode(), "0.3-with-standard-standard-everyone");

        let key = ScenarioKey::new(-0.25, Steering::Without, "a", "b", "c");
        assert_eq!(key.encode(), "-0.3-without-a-b-c");

        let key = ScenarioKey::new(-0.04, Steering::With, "a", "b", "c");
        assert_eq!(key.encode(), "0.0-with-a-b-c");

        // 直接构造与解析得到同一个键
        assert_eq!(key, ScenarioKey::parse("0-with-a-b-c").unwrap());
    }

    #[test]
    fn test_serde_uses_encoded_key() {
        let key = ScenarioKey::new(1.5, Steering::Without, "standard", "standard", "standard");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"1.5-without-standard-standard-standard\"");

        let back: ScenarioKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<ScenarioKey>("\"1.0-maybe-a-b-c\"").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ScenarioKey::parse("1.0-with-standard"),
            Err(ScenarioKeyError::WrongSegmentCount { .. })
        ));
        assert!(matches!(
            ScenarioKey::parse("abc-with-a-b-c"),
            Err(ScenarioKeyError::InvalidProductivity(_))
        ));
        assert!(matches!(
            ScenarioKey::parse("1.0-maybe-a-b-c"),
            Err(ScenarioKeyError::InvalidSteering(_))
        ));
    }
}
