// ==========================================
// 劳动力市场转型看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 覆写顺序: 基础配置（默认值或 JSON 文件）→ config_kv 中的 global 项
// ==========================================

use crate::config::waterfall_config::{ConfigError, ConfigResult, WaterfallConfig};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// 全局作用域标识
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动建表）
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并确保表存在（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::Lock(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(config_key = key, value = value, "配置已写入");
        Ok(())
    }

    /// 解析单个覆写项
    fn parse_override<T: FromStr>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get_global_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                }),
            None => Ok(None),
        }
    }

    /// 在基础配置上叠加 config_kv 覆写,并校验结果
    ///
    /// # 参数
    /// - base: 默认值或 JSON 文件加载的配置
    ///
    /// # 返回
    /// - Err(InvalidValue): 覆写值无法解析
    /// - Err(Validation): 覆写后的配置不合法
    pub fn load_waterfall_config(&self, base: WaterfallConfig) -> ConfigResult<WaterfallConfig> {
        let mut config = base;

        if let Some(v) = self.parse_override::<f64>(config_keys::NOISE_FLOOR)? {
            config.noise_floor = v;
        }
        if let Some(v) = self.get_global_config_value(config_keys::AGGREGATE_KEY)? {
            config.aggregate_key = v.trim().to_string();
        }
        if let Some(v) = self.parse_override::<f64>(config_keys::AGGREGATE_DOMAIN_MIN)? {
            config.aggregate_domain_min = v;
        }
        if let Some(v) = self.parse_override::<f64>(config_keys::AGGREGATE_DOMAIN_MAX)? {
            config.aggregate_domain_max = v;
        }
        if let Some(v) = self.parse_override::<u32>(config_keys::MAX_TICK_COUNT)? {
            config.max_tick_count = v;
        }
        if let Some(v) = self.parse_override::<f64>(config_keys::HEADROOM_FACTOR)? {
            config.headroom_factor = v;
        }
        if let Some(v) = self.parse_override::<f64>(config_keys::CONNECTOR_INSET)? {
            config.connector_inset = v;
        }
        if let Some(v) = self.parse_override::<usize>(config_keys::LABEL_WRAP_WIDTH)? {
            config.label_wrap_width = v;
        }
        if let Some(v) = self.get_global_config_value(config_keys::LOCALE)? {
            config.locale = crate::i18n::normalize_locale(&v).to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 数值处理
    pub const NOISE_FLOOR: &str = "noise_floor";

    // 汇总行
    pub const AGGREGATE_KEY: &str = "aggregate_key";
    pub const AGGREGATE_DOMAIN_MIN: &str = "aggregate_domain_min";
    pub const AGGREGATE_DOMAIN_MAX: &str = "aggregate_domain_max";

    // 刻度
    pub const MAX_TICK_COUNT: &str = "max_tick_count";
    pub const HEADROOM_FACTOR: &str = "headroom_factor";

    // 渲染
    pub const CONNECTOR_INSET: &str = "connector_inset";
    pub const LABEL_WRAP_WIDTH: &str = "label_wrap_width";
    pub const LOCALE: &str = "locale";
}
