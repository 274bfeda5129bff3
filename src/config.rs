//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;

/// Deployment environment; selects the default generative-text endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn default_generator_url(self) -> &'static str {
        match self {
            Environment::Development => "http://127.0.0.1:8089",
            Environment::Production => "https://generativelanguage.googleapis.com",
        }
    }
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "study-focus")]
#[command(about = "Study companion server with a pomodoro focus controller and AI study helpers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "STUDY_FOCUS_PORT", default_value = "5000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "STUDY_FOCUS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Deployment environment
    #[arg(long = "env", env = "STUDY_FOCUS_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    /// Base URL of the generative-text API (defaults per environment)
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub generator_url: Option<String>,

    /// Generative model name
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-pro")]
    pub model: String,

    /// API key for the generative-text provider; AI features are disabled without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for a single generative request, in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// How long a break may wait for reflection questions before using the fallback set
    #[arg(long, default_value = "10")]
    pub reflection_timeout_secs: u64,

    /// Reflection questions requested when a break ends
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u16).range(1..=10))]
    pub reflection_count: u16,

    /// Close focus sessions that are not counting down and were not requested for this many minutes
    #[arg(long, default_value = "120", value_parser = clap::value_parser!(u64).range(1..))]
    pub session_idle_minutes: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn generator_url(&self) -> &str {
        self.generator_url
            .as_deref()
            .unwrap_or_else(|| self.environment.default_generator_url())
    }

    /// The configured key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reflection_timeout(&self) -> Duration {
        Duration::from_secs(self.reflection_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }

    /// How often the sweeper looks for idle sessions
    pub fn sweep_interval(&self) -> Duration {
        (self.session_idle_timeout() / 4).max(Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["study-focus"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn environment_selects_generator_url() {
        let config = parse(&["--env", "production", "--api-key", "k"]);
        assert_eq!(config.generator_url(), "https://generativelanguage.googleapis.com");

        let config = parse(&["--env", "development", "--generator-url", "http://localhost:9999"]);
        assert_eq!(config.generator_url(), "http://localhost:9999");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = parse(&["--api-key", "   "]);
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn address_and_log_level() {
        let config = parse(&["-p", "8080", "--host", "127.0.0.1", "-v"]);
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.reflection_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn idle_timeout_drives_sweep_interval() {
        let config = parse(&[]);
        assert_eq!(config.session_idle_timeout(), Duration::from_secs(7200));
        assert_eq!(config.sweep_interval(), Duration::from_secs(1800));

        let config = parse(&["--session-idle-minutes", "1"]);
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
    }

    #[test]
    fn reflection_count_is_bounded() {
        let argv = ["study-focus", "--reflection-count", "0"];
        assert!(Config::try_parse_from(argv).is_err());
    }
}
