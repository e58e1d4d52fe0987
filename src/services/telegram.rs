//! Telegram notification service
//!
//! Thin outbound collaborator around the Bot API `sendMessage` call. The
//! reconcilers never call this directly; the reminder sweep does.

use serde_json::json;

use crate::{
    config::TelegramConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct TelegramService {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramService {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Notifications are active only when a bot token is configured
    pub fn is_enabled(&self) -> bool {
        self.config.bot_token.is_some()
    }

    /// Send a plain text message to one chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let token = self
            .config
            .bot_token
            .as_ref()
            .ok_or_else(|| AppError::Notification("Telegram bot token not configured".to_string()))?;

        let url = format!("{}/bot{}/sendMessage", self.config.api_base_url, token);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Telegram request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Telegram API returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    /// Templated overdue reminder text
    pub fn overdue_message(member_name: &str, loan_count: i64, earliest_due: chrono::NaiveDate) -> String {
        format!(
            "Hello {}, you have {} overdue loan(s) at the library. The earliest was due on {}. Please return the books or contact us.",
            member_name, loan_count, earliest_due
        )
    }
}
