use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub google_search_key: String,
    pub google_search_cx: String,
    pub search_site: Option<String>,
    pub jobs_base_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_ops_chat_id: Option<String>,
    pub telegram_subscribers_chat_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            google_search_key: env::var("GOOGLE_SEARCH_KEY")
                .context("GOOGLE_SEARCH_KEY must be set")?,
            google_search_cx: env::var("GOOGLE_SEARCH_CX")
                .context("GOOGLE_SEARCH_CX must be set")?,
            search_site: env::var("SEARCH_SITE").ok(),
            jobs_base_url: env::var("JOBS_BASE_URL")
                .unwrap_or_else(|_| "https://kerja-radar.example/jobs".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_ops_chat_id: env::var("TELEGRAM_OPS_CHAT_ID").ok(),
            telegram_subscribers_chat_id: env::var("TELEGRAM_SUBSCRIBERS_CHAT_ID").ok(),
        })
    }

    /// Telegram is only usable with a token and both chat ids.
    pub fn telegram(&self) -> Option<(String, String, String)> {
        match (
            &self.telegram_bot_token,
            &self.telegram_ops_chat_id,
            &self.telegram_subscribers_chat_id,
        ) {
            (Some(token), Some(ops), Some(subscribers)) => {
                Some((token.clone(), ops.clone(), subscribers.clone()))
            }
            _ => None,
        }
    }
}
