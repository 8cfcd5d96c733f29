// ==========================================
// 劳动力市场转型看板 - 瀑布图展示 API
// ==========================================
// 职责: 职业选择状态机,驱动整条计算管线
// 流程: provider.get → 映射 → 堆叠 → 纵轴 → 连接线 → 脚注合并
// 状态:
// - Ready(WaterfallView): 选中职业有数据
// - NoData: 职业不存在（可恢复,再次 select 即可）
// 红线:
// - 单块面板失败不影响其余面板,纵轴只按成功面板计算
// - 计算同步完成,不持有跨调用的可变中间结果
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::api::dto::{PanelOutcome, WaterfallState, WaterfallView};
use crate::api::error::{ApiError, ApiResult};
use crate::config::waterfall_config::WaterfallConfig;
use crate::domain::metrics::WorkforceMetrics;
use crate::domain::segment::{CascadeDataset, Footnote};
use crate::domain::types::PanelKind;
use crate::engine::{
    CascadeBuilder, ChartDataMapper, ChartResult, ConnectorRouter, DomainCalculator,
};
use crate::i18n;
use crate::perf::PerfGuard;
use crate::provider::{MetricsProvider, ScenarioHighlights};

/// 职业排序: 汇总行置顶,其余按不区分大小写的字母序（相同时按字节序）
pub fn sort_occupations(mut occupations: Vec<String>, aggregate_key: &str) -> Vec<String> {
    occupations.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    occupations.dedup();

    if let Some(pos) = occupations.iter().position(|o| o == aggregate_key) {
        let aggregate = occupations.remove(pos);
        occupations.insert(0, aggregate);
    }
    occupations
}

/// 合并脚注: 按编号去重并排序
pub fn pool_footnotes<'a>(datasets: impl IntoIterator<Item = &'a CascadeDataset>) -> Vec<Footnote> {
    let mut pooled: BTreeMap<u32, Footnote> = BTreeMap::new();
    for dataset in datasets {
        for footnote in dataset.footnotes() {
            pooled
                .entry(footnote.number)
                .or_insert_with(|| footnote.clone());
        }
    }
    pooled.into_values().collect()
}

// ==========================================
// WaterfallPresenter - 瀑布图展示器
// ==========================================
pub struct WaterfallPresenter {
    provider: Arc<dyn MetricsProvider>,
    config: WaterfallConfig,
    mapper: ChartDataMapper,
    cascade: CascadeBuilder,
    domain_calc: DomainCalculator,
    router: ConnectorRouter,
    occupations: Vec<String>,
    selected: Option<String>,
    state: WaterfallState,
}

impl WaterfallPresenter {
    /// 创建展示器并选中第一个职业
    ///
    /// # 参数
    /// - provider: 已完成 init 的数据源
    /// - config: 已校验的配置
    ///
    /// # 返回
    /// - Err(DataSourceNotReady): 数据源未 init
    /// - Err(ConfigError): 配置不合法
    pub fn new(provider: Arc<dyn MetricsProvider>, config: WaterfallConfig) -> ApiResult<Self> {
        config.validate()?;
        if !provider.is_ready() {
            return Err(ApiError::DataSourceNotReady(
                "数据源尚未初始化,请先调用 init()".to_string(),
            ));
        }

        let occupations = sort_occupations(provider.occupations()?, &config.aggregate_key);
        let locale = i18n::normalize_locale(&config.locale);

        let mut presenter = Self {
            mapper: ChartDataMapper::new(config.noise_floor, locale),
            cascade: CascadeBuilder::new(config.noise_floor),
            domain_calc: DomainCalculator::from_config(&config),
            router: ConnectorRouter::new(config.connector_inset),
            provider,
            config,
            occupations,
            selected: None,
            state: WaterfallState::NoData {
                occupation: String::new(),
                message: String::new(),
            },
        };

        match presenter.occupations.first().cloned() {
            Some(first) => {
                presenter.select(&first)?;
            }
            None => {
                warn!("数据源中没有任何职业");
                presenter.state = presenter.no_data("");
            }
        }

        Ok(presenter)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 排序后的职业列表（汇总行在首位）
    pub fn occupations(&self) -> &[String] {
        &self.occupations
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> &WaterfallState {
        &self.state
    }

    pub fn view(&self) -> Option<&WaterfallView> {
        self.state.view()
    }

    pub fn config(&self) -> &WaterfallConfig {
        &self.config
    }

    // ==========================================
    // 选择接口
    // ==========================================

    /// 选中职业并同步重算
    ///
    /// # 返回
    /// - Ok(Ready): 计算完成（可能包含失败面板）
    /// - Ok(NoData): 职业不存在
    /// - Err: 数据源读取失败（选中职业与视图保持不变）
    #[instrument(skip(self))]
    pub fn select(&mut self, occupation: &str) -> ApiResult<&WaterfallState> {
        let _perf = PerfGuard::with_detail("waterfall.select", occupation.to_string());

        let fetched = self.provider.get(occupation)?;
        self.state = match fetched {
            Some(metrics) => WaterfallState::Ready(self.build_view(occupation, &metrics)),
            None => {
                info!(occupation = %occupation, "职业无数据");
                self.no_data(occupation)
            }
        };
        self.selected = Some(occupation.to_string());

        Ok(&self.state)
    }

    /// 当前情景的附带结果（数据源不提供时为 None）
    pub fn highlights(&self) -> Option<&ScenarioHighlights> {
        self.provider.highlights()
    }

    fn no_data(&self, occupation: &str) -> WaterfallState {
        WaterfallState::NoData {
            occupation: occupation.to_string(),
            message: i18n::t_in_with_args(
                self.mapper.locale(),
                "view.no_data",
                &[("occupation", occupation)],
            ),
        }
    }

    // ==========================================
    // 计算管线
    // ==========================================

    fn build_panel(&self, panel: PanelKind, metrics: &WorkforceMetrics) -> ChartResult<CascadeDataset> {
        let drafts = self.mapper.drafts_for(panel, metrics)?;
        let segments = self.cascade.process(panel.stack_direction(), &drafts);
        Ok(CascadeDataset::new(panel, segments))
    }

    fn outcome(&self, panel: PanelKind, metrics: &WorkforceMetrics) -> PanelOutcome {
        match self.build_panel(panel, metrics) {
            Ok(dataset) => {
                let connectors = self.router.route(&dataset);
                PanelOutcome::Ready {
                    dataset,
                    connectors,
                }
            }
            Err(e) => {
                warn!(panel = %panel, error = %e, "面板计算失败,其余面板继续");
                PanelOutcome::Failed {
                    panel,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 为单个职业计算完整视图（纯计算,不改变选中状态）
    pub fn build_view(&self, occupation: &str, metrics: &WorkforceMetrics) -> WaterfallView {
        let supply = self.outcome(PanelKind::Supply, metrics);
        let gap = self.outcome(PanelKind::Gap, metrics);
        let demand = self.outcome(PanelKind::Demand, metrics);

        let ready: Vec<&CascadeDataset> = [&supply, &gap, &demand]
            .into_iter()
            .filter_map(PanelOutcome::dataset)
            .collect();

        let domain = self.domain_calc.calculate(occupation, &ready);
        let ticks = self.domain_calc.scale().tick_positions(&domain);
        let waterfall_minimum = self.domain_calc.waterfall_minimum(&ready);
        let footnotes = pool_footnotes(ready.iter().copied());

        debug!(
            occupation = %occupation,
            ready_panels = ready.len(),
            domain_min = domain.min,
            domain_max = domain.max,
            ticks = ticks.len(),
            "视图计算完成"
        );

        WaterfallView {
            view_id: Uuid::new_v4(),
            occupation: occupation.to_string(),
            locale: self.mapper.locale().to_string(),
            generated_at: Utc::now(),
            supply,
            gap,
            demand,
            domain,
            ticks,
            waterfall_minimum,
            footnotes,
        }
    }
}
