//! SMS delivery through Twilio's Messages API.
//!
//! The relay endpoint and the reminder sink both go through [`SmsService`],
//! which validates input and delegates to an [`SmsProvider`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domain::notification::{ReminderSink, ScheduledReminder};

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Twilio account credentials
#[derive(Debug, Clone, PartialEq)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number registered with the account
    pub from_number: String,
    pub api_base: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS provider is not configured")]
    NotConfigured,
    #[error("Phone number is required")]
    MissingPhone,
    #[error("Message is required")]
    MissingMessage,
    #[error("SMS provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Something that can deliver a text message
#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<()>;

    /// Ok when the provider has what it needs to send
    fn ensure_ready(&self) -> Result<()>;
}

pub struct TwilioSmsProvider {
    config: Option<TwilioConfig>,
    client: reqwest::Client,
}

impl TwilioSmsProvider {
    pub fn new(config: Option<TwilioConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    fn messages_url(config: &TwilioConfig) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.trim_end_matches('/'),
            config.account_sid
        )
    }
}

#[async_trait]
impl SmsProvider for TwilioSmsProvider {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        let config = self.config.as_ref().ok_or(SmsError::NotConfigured)?;

        let response = self
            .client
            .post(Self::messages_url(config))
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[("To", to), ("From", config.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .context("Twilio request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Provider {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.config {
            Some(_) => Ok(()),
            None => Err(SmsError::NotConfigured.into()),
        }
    }
}

#[derive(Clone)]
pub struct SmsService {
    provider: Arc<dyn SmsProvider>,
}

impl SmsService {
    pub fn new(provider: Arc<dyn SmsProvider>) -> Self {
        Self { provider }
    }

    /// Send `message` to `phone`, rejecting blank input before calling the provider
    pub async fn send_sms(&self, phone: &str, message: &str) -> Result<()> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(SmsError::MissingPhone.into());
        }
        if message.trim().is_empty() {
            return Err(SmsError::MissingMessage.into());
        }

        info!("Sending SMS to {}", phone);
        self.provider.send(phone, message).await
    }

    pub fn ensure_ready(&self) -> Result<()> {
        self.provider.ensure_ready()
    }
}

/// Delivers reminders as SMS once their notify time arrives.
///
/// Each reminder waits in its own task; cancelling the token drops every
/// reminder that has not been sent yet.
#[derive(Clone)]
pub struct SmsReminderSink {
    sms: SmsService,
    cancel: CancellationToken,
}

impl SmsReminderSink {
    pub fn new(sms: SmsService, cancel: CancellationToken) -> Self {
        Self { sms, cancel }
    }

    /// Spawn the delayed delivery for `reminder` on the current runtime
    pub fn spawn_delivery(&self, reminder: ScheduledReminder) -> Result<JoinHandle<()>> {
        let runtime = tokio::runtime::Handle::try_current().context("No async runtime for reminder delivery")?;
        let sms = self.sms.clone();
        let cancel = self.cancel.clone();

        let delay = (reminder.notify_at - Local::now().naive_local())
            .to_std()
            .unwrap_or_default();

        Ok(runtime.spawn(async move {
            let task_id = reminder.payload.task_id;
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => {
                    debug!(task_id, "Reminder cancelled before delivery");
                    return;
                }
            }

            let Some(phone) = reminder.payload.phone.as_deref() else {
                debug!(task_id, "Assignee has no phone, reminder not sent");
                return;
            };
            let text = format!("{}: {}", reminder.payload.title, reminder.payload.body);
            if let Err(e) = sms.send_sms(phone, &text).await {
                error!(task_id, "Failed to deliver reminder: {:?}", e);
            }
        }))
    }
}

impl ReminderSink for SmsReminderSink {
    fn hand_off(&self, reminder: ScheduledReminder) -> Result<()> {
        self.spawn_delivery(reminder).map(|_| ())
    }
}
