// ==========================================
// 劳动力市场转型看板 - 渲染计划
// ==========================================
// 职责: WaterfallView → 与绘图库无关的渲染指令
// 内容: 标题、纵轴位置、横轴范围 [0.5, n + 0.5]、柱体（填充/标签/换行/脚注角标/提示框）、
//       连接线、刻度及刻度文本、面板宽度、合并脚注
// 附带: 情景级的剩余缺口排行、转岗流向排行、增加值变化卡片（各取前 10）
// ==========================================

use crate::api::dto::{PanelOutcome, WaterfallView};
use crate::config::waterfall_config::WaterfallConfig;
use crate::domain::chart::{AxisDomain, ConnectorSegment};
use crate::domain::segment::{ChartSegment, Footnote};
use crate::domain::types::PanelKind;
use crate::engine::number_format::NumberFormatter;
use crate::i18n;
use crate::provider::ScenarioHighlights;
use crate::render::layout::{AxisSide, BarFill, LayoutKind, LayoutProfile, Margins, PanelWidth};
use serde::Serialize;
use uuid::Uuid;

/// 排行类图表保留的条目数
pub const HIGHLIGHT_TOP_N: usize = 10;

/// 指标卡片数值颜色
pub const METRIC_CARD_COLOR: &str = "rgb(0,153,168)";

/// 百分比文本: 两位小数（0.5 远离零）,小数点按语言
pub fn format_percent(value: f64, locale: &str) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded).replace('.', &i18n::decimal_separator(locale).to_string());
    format!("{}%", text)
}

/// 按空格折行
///
/// 单词依次追加,加上后超过 max_width 个字符则另起一行;超长单词独占一行
pub fn wrap_label(text: &str, max_width: usize) -> Vec<String> {
    let mut words = text.split(' ');
    let mut lines = Vec::new();
    let mut current = words.next().unwrap_or("").to_string();

    for word in words {
        if current.chars().count() + word.chars().count() + 1 <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

// ==========================================
// 渲染指令
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTone {
    Positive,
    Negative,
}

/// 提示框（展示值为 0 时不提供）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub value_text: String,
    pub exact_text: String,
    pub tone: ValueTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPlan {
    pub id: String,
    pub ordinal: u32,
    pub base: f64,
    pub value: f64,
    pub fill: BarFill,
    pub value_label: String,
    pub value_label_color: &'static str,
    pub category_lines: Vec<String>,
    pub footnote_marker: Option<u32>,
    pub tooltip: Option<Tooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelPlan {
    pub panel: PanelKind,
    pub title: String,
    pub subtitle: String,
    pub axis: Option<AxisSide>,
    pub margins: Margins,
    pub width: PanelWidth,
    pub x_domain: (f64, f64),
    pub bars: Vec<BarPlan>,
    pub connectors: Vec<ConnectorSegment>,
    pub failure: Option<String>,
}

/// 排行柱（剩余缺口）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
    pub value_text: String,
}

/// 转岗流向（桑基图连线）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionLink {
    pub source: String,
    pub target: String,
    pub amount: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCardPlan {
    pub title: String,
    pub value: f64,
    pub value_text: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightsPlan {
    pub shortages_title: String,
    pub shortages: Vec<RankedBar>,
    pub transitions_title: String,
    pub transitions: Vec<TransitionLink>,
    pub added_value: Option<MetricCardPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub view_id: Uuid,
    pub occupation: String,
    pub layout: LayoutKind,
    pub chart_height: u32,
    pub bar_size: u32,
    pub domain: AxisDomain,
    pub ticks: Vec<AxisTick>,
    pub panels: Vec<PanelPlan>,
    pub footnotes: Vec<Footnote>,
    pub clipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<HighlightsPlan>,
}

// ==========================================
// RenderPlanner - 渲染计划生成器
// ==========================================
#[derive(Debug, Clone)]
pub struct RenderPlanner {
    profile: LayoutProfile,
    formatter: NumberFormatter,
    locale: String,
    wrap_width: usize,
}

impl RenderPlanner {
    pub fn new(profile: LayoutProfile, config: &WaterfallConfig) -> Self {
        let locale = i18n::normalize_locale(&config.locale).to_string();
        Self {
            formatter: NumberFormatter::for_locale(config.noise_floor, &locale),
            profile,
            locale,
            wrap_width: config.label_wrap_width,
        }
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    fn title_keys(&self, panel: PanelKind) -> (String, String) {
        let prefix = format!("panel.{}", panel.i18n_key());
        if self.profile.compact_titles {
            (
                format!("{}.compact_title", prefix),
                format!("{}.compact_subtitle", prefix),
            )
        } else {
            (format!("{}.title", prefix), format!("{}.subtitle", prefix))
        }
    }

    fn tooltip(&self, segment: &ChartSegment) -> Option<Tooltip> {
        if segment.display_value == 0.0 {
            return None;
        }
        let tone = if segment.display_value > 0.0 {
            ValueTone::Positive
        } else {
            ValueTone::Negative
        };
        Some(Tooltip {
            title: segment.name.clone(),
            value_text: self.formatter.format(segment.display_value),
            exact_text: self.formatter.format_grouped(segment.display_value),
            tone,
        })
    }

    fn bar(&self, segment: &ChartSegment) -> BarPlan {
        let palette = &self.profile.palette;
        let category_lines = if self.profile.wrap_labels {
            wrap_label(&segment.name, self.wrap_width)
        } else {
            vec![segment.name.clone()]
        };

        BarPlan {
            id: segment.id.to_string(),
            ordinal: segment.ordinal,
            base: segment.base,
            value: segment.value,
            fill: palette.fill(segment.category, segment.value),
            value_label: self.formatter.format(segment.display_value),
            value_label_color: palette.label_color(segment.category, segment.display_value),
            category_lines,
            footnote_marker: segment.footnote.as_ref().map(|f| f.number),
            tooltip: self.tooltip(segment),
        }
    }

    fn panel(&self, outcome: &PanelOutcome, bar_counts: &[(PanelKind, usize)]) -> PanelPlan {
        let kind = outcome.panel();
        let (title_key, subtitle_key) = self.title_keys(kind);
        let axis = self.profile.axis_for(kind);

        let (bars, failure): (Vec<BarPlan>, Option<String>) = match outcome {
            PanelOutcome::Ready { dataset, .. } => {
                (dataset.segments.iter().map(|s| self.bar(s)).collect(), None)
            }
            PanelOutcome::Failed { .. } => (
                Vec::new(),
                Some(i18n::t_in(&self.locale, "view.panel_failed")),
            ),
        };

        PanelPlan {
            panel: kind,
            title: i18n::t_in(&self.locale, &title_key),
            subtitle: i18n::t_in(&self.locale, &subtitle_key),
            axis,
            margins: self.profile.margins(axis.is_some()),
            width: self.profile.panel_width(kind, bar_counts),
            x_domain: (0.5, bars.len() as f64 + 0.5),
            bars,
            connectors: outcome.connectors().to_vec(),
            failure,
        }
    }

    /// 生成渲染计划
    pub fn plan(&self, view: &WaterfallView) -> RenderPlan {
        let bar_counts: Vec<(PanelKind, usize)> = view
            .panels()
            .iter()
            .map(|o| (o.panel(), o.dataset().map_or(0, |d| d.len())))
            .collect();

        let ticks = view
            .ticks
            .iter()
            .map(|&value| AxisTick {
                value,
                label: self.formatter.format(value),
            })
            .collect();

        RenderPlan {
            view_id: view.view_id,
            occupation: view.occupation.clone(),
            layout: self.profile.kind,
            chart_height: self.profile.chart_height,
            bar_size: self.profile.bar_size,
            domain: view.domain,
            ticks,
            panels: view
                .panels()
                .iter()
                .map(|o| self.panel(o, &bar_counts))
                .collect(),
            footnotes: view.footnotes.clone(),
            clipped: view.is_clipped(),
            highlights: None,
        }
    }

    /// 生成渲染计划并附上情景级附带结果
    pub fn plan_with_highlights(
        &self,
        view: &WaterfallView,
        highlights: Option<&ScenarioHighlights>,
    ) -> RenderPlan {
        let mut plan = self.plan(view);
        plan.highlights = highlights.map(|h| self.plan_highlights(h));
        plan
    }

    /// 附带结果: 缺口与转岗按数值降序取前 10,增加值变化格式化为百分比
    pub fn plan_highlights(&self, highlights: &ScenarioHighlights) -> HighlightsPlan {
        let mut shortages: Vec<RankedBar> = highlights
            .remaining_shortages
            .iter()
            .map(|s| RankedBar {
                label: s.occupation.clone(),
                value: s.shortage,
                value_text: self.formatter.format_grouped(s.shortage),
            })
            .collect();
        shortages.sort_by(|a, b| b.value.total_cmp(&a.value));
        shortages.truncate(HIGHLIGHT_TOP_N);

        let mut transitions: Vec<TransitionLink> = highlights
            .top_transitions
            .iter()
            .map(|t| {
                let amount = self.formatter.format_grouped(t.amount);
                TransitionLink {
                    source: t.source.clone(),
                    target: t.target.clone(),
                    amount: t.amount,
                    tooltip: i18n::t_in_with_args(
                        &self.locale,
                        "highlights.transition_tooltip",
                        &[("amount", amount.as_str())],
                    ),
                }
            })
            .collect();
        transitions.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        transitions.truncate(HIGHLIGHT_TOP_N);

        let added_value = highlights.added_value_change_percent.map(|value| MetricCardPlan {
            title: i18n::t_in(&self.locale, "highlights.added_value"),
            value,
            value_text: format_percent(value, &self.locale),
            color: METRIC_CARD_COLOR,
        });

        HighlightsPlan {
            shortages_title: i18n::t_in(&self.locale, "highlights.shortages"),
            shortages,
            transitions_title: i18n::t_in(&self.locale, "highlights.transitions"),
            transitions,
            added_value,
        }
    }
}
