use anyhow::{Context, Result};

const DEFAULT_PORT: &str = "8000";

/// Application configuration loaded from environment variables.
/// A missing `GROQ_API_KEY` is not fatal: generation calls fail fast and the
/// interview runs entirely on the catalog and the lexical scorer.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub enable_llm_evaluation: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            enable_llm_evaluation: parse_flag(
                std::env::var("ENABLE_LLM_EVALUATION").ok().as_deref(),
            )
            .context("ENABLE_LLM_EVALUATION must be true/false")?,
            port: parse_port(std::env::var("PORT").ok().as_deref())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn llm_configured(&self) -> bool {
        self.groq_api_key.is_some()
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    raw.map(str::trim)
        .unwrap_or(DEFAULT_PORT)
        .parse::<u16>()
        .context("PORT must be a valid port number")
}

fn parse_flag(raw: Option<&str>) -> Result<bool> {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" | "off" => Ok(false),
            "1" | "true" | "yes" | "on" => Ok(true),
            other => anyhow::bail!("unrecognised boolean value '{other}'"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_defaults_to_false_when_unset() {
        assert!(!parse_flag(None).unwrap());
    }

    #[test]
    fn test_flag_accepts_common_spellings() {
        assert!(parse_flag(Some("true")).unwrap());
        assert!(parse_flag(Some(" YES ")).unwrap());
        assert!(parse_flag(Some("1")).unwrap());
        assert!(!parse_flag(Some("off")).unwrap());
        assert!(!parse_flag(Some("")).unwrap());
    }

    #[test]
    fn test_flag_rejects_garbage() {
        assert!(parse_flag(Some("maybe")).is_err());
    }

    #[test]
    fn test_blank_env_value_is_unset() {
        std::env::set_var("INTERVIEWER_TEST_BLANK_KEY", "   ");
        assert_eq!(optional_env("INTERVIEWER_TEST_BLANK_KEY"), None);

        std::env::set_var("INTERVIEWER_TEST_PADDED_KEY", "  gsk_abc \n");
        assert_eq!(
            optional_env("INTERVIEWER_TEST_PADDED_KEY").as_deref(),
            Some("gsk_abc")
        );

        assert_eq!(optional_env("INTERVIEWER_TEST_NEVER_SET"), None);
    }

    #[test]
    fn test_port_defaults_when_unset() {
        assert_eq!(parse_port(None).unwrap(), 8000);
        assert_eq!(parse_port(Some(" 3000 ")).unwrap(), 3000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        for raw in ["eighty", "70000", "-1", ""] {
            let err = parse_port(Some(raw)).unwrap_err();
            assert_eq!(err.to_string(), "PORT must be a valid port number");
        }
    }

    #[test]
    fn test_llm_configured_tracks_api_key() {
        let mut config = Config {
            groq_api_key: None,
            enable_llm_evaluation: false,
            port: 8000,
            rust_log: "info".to_string(),
        };
        assert!(!config.llm_configured());
        config.groq_api_key = Some("gsk_test".to_string());
        assert!(config.llm_configured());
    }
}
