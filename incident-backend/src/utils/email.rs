// src/utils/email.rs

use chrono::{DateTime, FixedOffset, Utc};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::env;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

// 開発モードで保持する直近のメール件数
const OUTBOX_CAPACITY: usize = 50;

/// メール送信エラー
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("No notification recipients configured")]
    NoRecipients,
}

/// 送信方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    /// ログ出力と直近分の送信箱のみ（本番環境では使えない）
    Development,
    Smtp,
}

impl EmailProvider {
    fn parse(value: &str) -> Result<Self, EmailError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "development" | "dev" | "log" => Ok(Self::Development),
            "smtp" => Ok(Self::Smtp),
            other => Err(EmailError::ConfigurationError(format!(
                "Unknown EMAIL_PROVIDER: {}",
                other
            ))),
        }
    }
}

/// メール設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// 教育情報更新の通知先
    pub notify_recipients: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Development,
            smtp_host: "smtp.office365.com".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Incident Reporting".to_string(),
            notify_recipients: vec!["safety-team@example.com".to_string()],
        }
    }
}

impl EmailConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, EmailError> {
        let defaults = Self::default();

        let provider =
            EmailProvider::parse(&env::var("EMAIL_PROVIDER").unwrap_or_default())?;

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(port) => port
                .trim()
                .parse()
                .map_err(|_| EmailError::ConfigurationError("Invalid SMTP port".to_string()))?,
            Err(_) => defaults.smtp_port,
        };

        let notify_recipients = match env::var("NOTIFY_RECIPIENTS") {
            Ok(list) => split_recipients(&list),
            Err(_) => defaults.notify_recipients,
        };

        Ok(Self {
            provider,
            smtp_host: env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port,
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("FROM_EMAIL").unwrap_or(defaults.from_email),
            from_name: env::var("FROM_NAME").unwrap_or(defaults.from_name),
            notify_recipients,
        })
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<(), EmailError> {
        for recipient in &self.notify_recipients {
            if !is_valid_email(recipient) {
                return Err(EmailError::InvalidAddress(recipient.clone()));
            }
        }

        if self.provider == EmailProvider::Development {
            return Ok(());
        }

        if self.smtp_host.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP host is required".to_string(),
            ));
        }

        if self.smtp_username.is_empty() || self.smtp_password.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP credentials are required".to_string(),
            ));
        }

        if !is_valid_email(&self.from_email) {
            return Err(EmailError::InvalidAddress(self.from_email.clone()));
        }

        if self.notify_recipients.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        Ok(())
    }

    /// 実際に配送される設定か
    pub fn require_delivery(&self) -> Result<(), EmailError> {
        match self.provider {
            EmailProvider::Smtp => Ok(()),
            EmailProvider::Development => Err(EmailError::ConfigurationError(
                "EMAIL_PROVIDER=smtp is required in production".to_string(),
            )),
        }
    }
}

/// メールテンプレート
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// メール送信内容
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to_emails: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// 教育情報更新通知の内容
#[derive(Debug, Clone)]
pub struct TrainingUpdateNotice<'a> {
    pub incident_id: i32,
    pub training_type_required: Option<&'a str>,
    pub training_description: Option<&'a str>,
    pub updated_by: &'a str,
    pub updated_on: DateTime<Utc>,
}

/// メール送信サービス
pub struct EmailService {
    config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    outbox: Mutex<VecDeque<EmailMessage>>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let transport = match config.provider {
            EmailProvider::Development => None,
            EmailProvider::Smtp => Some(
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| EmailError::ConfigurationError(e.to_string()))?
                    .port(config.smtp_port)
                    .credentials(Credentials::new(
                        config.smtp_username.clone(),
                        config.smtp_password.clone(),
                    ))
                    .timeout(Some(Duration::from_secs(30)))
                    .build(),
            ),
        };

        Ok(Self {
            config,
            transport,
            outbox: Mutex::new(VecDeque::with_capacity(OUTBOX_CAPACITY)),
        })
    }

    /// 環境変数から作成（本番環境では開発モードを拒否）
    pub fn from_env(production: bool) -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;
        if production {
            config.require_delivery()?;
        }
        Self::new(config)
    }

    /// 開発モードで送信した直近のメール（古い順）
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// メールを送信
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        if message.to_emails.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        for to in &message.to_emails {
            if !is_valid_email(to) {
                return Err(EmailError::InvalidAddress(to.clone()));
            }
        }

        let Some(transport) = &self.transport else {
            self.log_email(&message);
            if let Ok(mut outbox) = self.outbox.lock() {
                if outbox.len() == OUTBOX_CAPACITY {
                    outbox.pop_front();
                }
                outbox.push_back(message);
            }
            return Ok(());
        };

        let email = self.build_message(&message)?;

        transport.send(email).await.map_err(|e| {
            error!(error = %e, subject = %message.subject, "SMTP delivery failed");
            EmailError::SendError(e.to_string())
        })?;

        info!(
            recipients = message.to_emails.len(),
            subject = %message.subject,
            "Email sent successfully"
        );

        Ok(())
    }

    /// 教育情報更新の通知を送信
    pub async fn send_training_update_notification(
        &self,
        notice: &TrainingUpdateNotice<'_>,
    ) -> Result<(), EmailError> {
        let template = self.get_training_update_template(notice);

        let message = EmailMessage {
            to_emails: self.config.notify_recipients.clone(),
            subject: template.subject,
            html_body: template.html_body,
            text_body: template.text_body,
        };

        self.send_email(message).await
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from_address = self
            .config
            .from_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.config.from_email.clone()))?;

        let mut builder = Message::builder()
            .from(Mailbox::new(Some(self.config.from_name.clone()), from_address))
            .subject(message.subject.clone());

        for to in &message.to_emails {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.clone()))?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| EmailError::SendError(e.to_string()))
    }

    /// 開発モードでのメールログ出力
    fn log_email(&self, message: &EmailMessage) {
        let masked: Vec<String> = message.to_emails.iter().map(|e| mask_email(e)).collect();
        info!("📧 EMAIL (Development Mode)");
        info!("To: {}", masked.join(", "));
        info!("Subject: {}", message.subject);
        info!("--- Text Body ---");
        info!("{}", message.text_body);
        info!("--- End Email ---");
    }

    // --- テンプレートメソッド ---

    fn get_training_update_template(&self, notice: &TrainingUpdateNotice<'_>) -> EmailTemplate {
        let subject = format!("Training Information Updated - Incident #{}", notice.incident_id);
        let updated_on = format_ist(notice.updated_on);
        let training_type = notice.training_type_required.unwrap_or("(unchanged)");
        let description = notice.training_description.unwrap_or("(unchanged)");

        let html_body = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="utf-8">
                <title>Training Information Updated</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #c0392b;">Training Information Updated</h2>
                    <p>The training details for incident <strong>#{incident_id}</strong> have been updated.</p>
                    <table style="border-collapse: collapse; width: 100%;">
                        <tr><td style="padding: 6px; border: 1px solid #ddd;"><strong>Incident ID</strong></td><td style="padding: 6px; border: 1px solid #ddd;">{incident_id}</td></tr>
                        <tr><td style="padding: 6px; border: 1px solid #ddd;"><strong>Training Type Required</strong></td><td style="padding: 6px; border: 1px solid #ddd;">{training_type}</td></tr>
                        <tr><td style="padding: 6px; border: 1px solid #ddd;"><strong>Training Description</strong></td><td style="padding: 6px; border: 1px solid #ddd;">{description}</td></tr>
                        <tr><td style="padding: 6px; border: 1px solid #ddd;"><strong>Updated By</strong></td><td style="padding: 6px; border: 1px solid #ddd;">{updated_by}</td></tr>
                        <tr><td style="padding: 6px; border: 1px solid #ddd;"><strong>Updated On</strong></td><td style="padding: 6px; border: 1px solid #ddd;">{updated_on}</td></tr>
                    </table>
                    <hr style="margin: 30px 0; border: none; border-top: 1px solid #eee;">
                    <p style="font-size: 12px; color: #666;">This is an automated notification from the incident reporting system.</p>
                </div>
            </body>
            </html>
            "#,
            incident_id = notice.incident_id,
            training_type = escape_html(training_type),
            description = escape_html(description),
            updated_by = escape_html(notice.updated_by),
            updated_on = updated_on,
        );

        let text_body = format!(
            r#"
Training Information Updated

Incident ID: {incident_id}
Training Type Required: {training_type}
Training Description: {description}
Updated By: {updated_by}
Updated On: {updated_on}

---
This is an automated notification from the incident reporting system.
            "#,
            incident_id = notice.incident_id,
            training_type = training_type,
            description = description,
            updated_by = notice.updated_by,
            updated_on = updated_on,
        );

        EmailTemplate {
            subject,
            html_body,
            text_body,
        }
    }
}

// --- ユーティリティ関数 ---

/// Asia/Kolkata (UTC+05:30) の表示形式に変換
pub fn format_ist(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
        Some(ist) => at
            .with_timezone(&ist)
            .format("%d/%m/%Y, %I:%M:%S %p IST")
            .to_string(),
        None => at.to_rfc3339(),
    }
}

fn split_recipients(list: &str) -> Vec<String> {
    list.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 簡単なメールアドレス検証
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // ドメイン部に.が含まれ、.で始まったり終わったりしないこと
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// メールアドレスをマスク
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.chars().count() <= 2 {
            "*".repeat(local.chars().count())
        } else {
            let first: String = local.chars().take(1).collect();
            format!("{}****", first)
        };
        format!("{}{}", masked_local, domain)
    } else {
        "****@****".to_string()
    }
}
