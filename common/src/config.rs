pub const DEFAULT_LOCALE: &str = "en-us";
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// Environment variable holding an `EnvFilter` directive for the log stream.
pub const LOG_ENV_VAR: &str = "WINSVC_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Normalized locale code (`en-us`, `de-de`, ...) used to pick the message catalog.
    pub locale: String,
    /// Directive handed to the log subscriber.
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        let lang = std::env::var("LANG").ok();
        let log = std::env::var(LOG_ENV_VAR).ok();
        Self::from_vars(lang.as_deref(), log.as_deref())
    }

    pub fn from_vars(lang: Option<&str>, log_filter: Option<&str>) -> Self {
        let locale = lang
            .and_then(normalize_locale)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let log_filter = log_filter
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER)
            .to_string();

        Self { locale, log_filter }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(None, None)
    }
}

/// `en_US.UTF-8` becomes `en-us`. Empty values and the POSIX `C` locale yield `None`.
fn normalize_locale(raw: &str) -> Option<String> {
    let code = raw.split('.').next().unwrap_or_default().trim();
    if code.is_empty() || code.eq_ignore_ascii_case("c") || code.eq_ignore_ascii_case("posix") {
        return None;
    }
    Some(code.to_ascii_lowercase().replace('_', "-"))
}
