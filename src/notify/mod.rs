//! Outbound email notifications.
//!
//! Mail delivery is fire-and-forget: the auth service enqueues jobs on a
//! channel and a background worker POSTs them to the configured HTTP mail
//! API. Delivery failures are logged, never surfaced to the requester.

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::MailerConfig;

pub mod template;

/// Sink for account-lifecycle emails.
///
/// Implementations must not block; the production mailer only enqueues.
pub trait Notifier: Send + Sync {
    /// Send an email-verification OTP.
    fn send_otp_email(&self, to: &str, owner_name: &str, otp: &str, validity_minutes: i64);

    /// Send a password-reset link for the given token.
    fn send_password_reset_email(&self, to: &str, owner_name: &str, reset_token: &str);
}

/// A queued outbound email.
#[derive(Debug, Clone)]
enum EmailJob {
    Otp {
        to: String,
        owner_name: String,
        otp: String,
        validity_minutes: i64,
    },
    PasswordReset {
        to: String,
        owner_name: String,
        reset_token: String,
    },
}

/// Production [`Notifier`] backed by a background delivery worker.
#[derive(Debug, Clone)]
pub struct QueuedMailer {
    tx: mpsc::UnboundedSender<EmailJob>,
}

impl Notifier for QueuedMailer {
    fn send_otp_email(&self, to: &str, owner_name: &str, otp: &str, validity_minutes: i64) {
        self.enqueue(EmailJob::Otp {
            to: to.to_string(),
            owner_name: owner_name.to_string(),
            otp: otp.to_string(),
            validity_minutes,
        });
    }

    fn send_password_reset_email(&self, to: &str, owner_name: &str, reset_token: &str) {
        self.enqueue(EmailJob::PasswordReset {
            to: to.to_string(),
            owner_name: owner_name.to_string(),
            reset_token: reset_token.to_string(),
        });
    }
}

impl QueuedMailer {
    fn enqueue(&self, job: EmailJob) {
        if self.tx.send(job).is_err() {
            warn!("mail worker is gone, dropping outbound email");
        }
    }
}

/// Start the mail delivery worker and return the mailer handle.
pub fn spawn_mailer(config: MailerConfig) -> QueuedMailer {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_worker(config, rx));
    QueuedMailer { tx }
}

async fn run_worker(config: MailerConfig, mut rx: mpsc::UnboundedReceiver<EmailJob>) {
    let client = reqwest::Client::new();
    while let Some(job) = rx.recv().await {
        if let Err(e) = deliver(&client, &config, &job).await {
            warn!(error = %e, "email delivery failed");
        }
    }
    debug!("mail worker shutting down");
}

async fn deliver(
    client: &reqwest::Client,
    config: &MailerConfig,
    job: &EmailJob,
) -> Result<(), reqwest::Error> {
    let (to, subject, html) = match job {
        EmailJob::Otp {
            to,
            owner_name,
            otp,
            validity_minutes,
        } => (
            to,
            template::OTP_SUBJECT,
            template::render_otp_email(owner_name, otp, *validity_minutes, &config.support_email),
        ),
        EmailJob::PasswordReset {
            to,
            owner_name,
            reset_token,
        } => {
            let link = format!(
                "{}/reset-password?token={}",
                config.website_url.trim_end_matches('/'),
                reset_token
            );
            (
                to,
                template::RESET_SUBJECT,
                template::render_reset_email(owner_name, &link, &config.support_email),
            )
        }
    };

    let body = json!({
        "from": { "email": config.from_email, "name": config.from_name },
        "to": [{ "email": to }],
        "subject": subject,
        "html": html,
    });

    let response = client
        .post(&config.endpoint)
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await?;

    match response.error_for_status() {
        Ok(_) => {
            debug!(to = %to, subject, "email delivered");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
