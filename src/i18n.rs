// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持荷兰语（默认）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 管线内部一律使用显式 locale 的 t_in,不依赖全局语言状态
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["nl", "en"];

/// 默认语言
pub const DEFAULT_LOCALE: &str = "nl";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"nl" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化语言代码（不支持的语言回退到默认语言）
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();
    let primary = lower.split(['-', '_']).next().unwrap_or("");
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| *l == primary)
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（当前全局语言）
///
/// # 示例
/// ```no_run
/// use workforce_waterfall::i18n::t;
/// let msg = t("panel.supply.title");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（指定语言）
pub fn t_in(locale: &str, key: &str) -> String {
    let locale = normalize_locale(locale);
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言,带参数）
///
/// # 示例
/// ```no_run
/// use workforce_waterfall::i18n::t_in_with_args;
/// let msg = t_in_with_args("nl", "view.no_data", &[("occupation", "Verpleegkundigen")]);
/// ```
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 千位分隔符
pub fn thousands_separator(locale: &str) -> char {
    match normalize_locale(locale) {
        "nl" => '.',
        _ => ',',
    }
}

/// 小数点
pub fn decimal_separator(locale: &str) -> char {
    match normalize_locale(locale) {
        "nl" => ',',
        _ => '.',
    }
}
