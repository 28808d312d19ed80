use std::net::SocketAddr;

use crate::data::models::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TTS_VOICE: &str = "Charon";

/// Server settings, read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_text_model: String,
    pub gemini_tts_model: String,
    pub gemini_tts_voice: String,
    pub gemini_timeout_secs: u64,
    pub session_inactivity_hours: i64,
    pub templates_glob: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: parse("BIND_ADDR", get("BIND_ADDR", DEFAULT_BIND_ADDR))?,
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_base_url: get("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            gemini_text_model: get("GEMINI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            gemini_tts_model: get("GEMINI_TTS_MODEL", DEFAULT_TTS_MODEL),
            gemini_tts_voice: get("GEMINI_TTS_VOICE", DEFAULT_TTS_VOICE),
            gemini_timeout_secs: parse("GEMINI_TIMEOUT_SECS", get("GEMINI_TIMEOUT_SECS", "60"))?,
            session_inactivity_hours: parse(
                "SESSION_INACTIVITY_HOURS",
                get("SESSION_INACTIVITY_HOURS", "24"),
            )?,
            templates_glob: get("TEMPLATES_GLOB", "templates/**/*.html"),
            static_dir: get("STATIC_DIR", "static"),
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_text_model, "gemini-2.5-flash");
        assert_eq!(config.gemini_tts_voice, "Charon");
        assert_eq!(config.gemini_timeout_secs, 60);
        assert_eq!(config.session_inactivity_hours, 24);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_TTS_VOICE", "Kore"),
            ("GEMINI_TIMEOUT_SECS", " 15 "),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_tts_voice, "Kore");
        assert_eq!(config.gemini_timeout_secs, 15);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();

        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("GEMINI_TIMEOUT_SECS", "soon")])).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "GEMINI_TIMEOUT_SECS", .. }));
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
    }
}
