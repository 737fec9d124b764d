//! Notification boundary.
//!
//! The pipeline only ever hands a plain text message and a channel to
//! this trait; delivery is fire-and-forget and failures are logged,
//! never propagated into the run outcome.

use async_trait::async_trait;
use std::sync::RwLock;
use tracing::warn;

use crate::error::{DiscoveryError, Result};

/// Where a message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Operational updates (run outcomes, sweep counts).
    Ops,

    /// End-user announcements (new postings, digests).
    Subscribers,
}

/// Outbound notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Push a plain text message. No delivery guarantee is assumed.
    async fn notify(&self, channel: Channel, text: &str) -> Result<()>;

    /// Notify and swallow the failure with a warning.
    ///
    /// The run must not abort because an announcement bounced.
    async fn notify_best_effort(&self, channel: Channel, text: &str) {
        if let Err(e) = self.notify(channel, text).await {
            warn!(?channel, error = %e, "notification failed");
        }
    }
}

/// Telegram Bot API sink. One chat per channel.
pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    ops_chat_id: String,
    subscribers_chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        token: impl Into<String>,
        ops_chat_id: impl Into<String>,
        subscribers_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to create HTTP client"),
            token: token.into(),
            ops_chat_id: ops_chat_id.into(),
            subscribers_chat_id: subscribers_chat_id.into(),
        }
    }

    fn chat_id(&self, channel: Channel) -> &str {
        match channel {
            Channel::Ops => &self.ops_chat_id,
            Channel::Subscribers => &self.subscribers_chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, channel: Channel, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id(channel)), ("text", text)])
            .send()
            .await
            .map_err(|e| DiscoveryError::Notify(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Notify(Box::new(std::io::Error::other(
                format!("telegram error {status}: {body}"),
            ))));
        }

        Ok(())
    }
}

/// No-op sink for deployments without a configured bot.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, channel: Channel, text: &str) -> Result<()> {
        tracing::debug!(?channel, text, "notifier not configured, dropping message");
        Ok(())
    }
}

/// Recording sink for tests.
#[derive(Default)]
pub struct MockNotifier {
    messages: RwLock<Vec<(Channel, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, in order.
    pub fn messages(&self) -> Vec<(Channel, String)> {
        self.messages.read().unwrap().clone()
    }

    /// Messages sent to one channel.
    pub fn messages_for(&self, channel: Channel) -> Vec<String> {
        self.messages
            .read()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, channel: Channel, text: &str) -> Result<()> {
        self.messages
            .write()
            .unwrap()
            .push((channel, text.to_string()));
        Ok(())
    }
}
