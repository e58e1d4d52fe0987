//! Daily overdue-reminder sweep
//!
//! Background task started from `main`. Failures are logged and never
//! propagate into request handling.

use std::time::Duration;

use crate::AppState;

use super::telegram::TelegramService;

/// Run the sweep loop until the process exits
pub async fn run(state: AppState) {
    let hours = state.config.telegram.reminder_interval_hours;
    if hours == 0 || !state.services.telegram.is_enabled() {
        tracing::info!("overdue reminder sweep disabled");
        return;
    }

    let mut interval = tokio::time::interval(Duration::from_secs(hours * 3600));
    // First tick fires immediately; skip it so a restart doesn't re-notify
    interval.tick().await;

    loop {
        interval.tick().await;
        if let Err(e) = sweep_once(&state).await {
            tracing::error!("overdue reminder sweep failed: {}", e);
        }
    }
}

/// One pass: find members with overdue loans and a Telegram chat, message each
pub async fn sweep_once(state: &AppState) -> crate::AppResult<()> {
    let reminders = state.services.loans.overdue_reminders().await?;
    tracing::info!(members = reminders.len(), "running overdue reminder sweep");

    for reminder in reminders {
        let text = TelegramService::overdue_message(
            &reminder.member_name,
            reminder.loan_count,
            reminder.earliest_due,
        );
        if let Err(e) = state
            .services
            .telegram
            .send_message(reminder.telegram_chat_id, &text)
            .await
        {
            tracing::warn!(
                chat_id = reminder.telegram_chat_id,
                "failed to send overdue reminder: {}",
                e
            );
        }
    }
    Ok(())
}
