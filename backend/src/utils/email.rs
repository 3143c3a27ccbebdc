use anyhow::Result;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::env;

pub struct EmailService {
    mailer: SmtpTransport,
    from_address: String,
}

impl EmailService {
    pub fn new() -> Result<Self> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .unwrap_or(587);
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address = env::var("SMTP_FROM_ADDRESS")
            .unwrap_or_else(|_| "noreply@tasknest.local".to_string());

        let mailer = if smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&smtp_host)
                .port(smtp_port)
                .build()
        } else {
            let creds = Credentials::new(smtp_username, smtp_password);
            SmtpTransport::relay(&smtp_host)?
                .port(smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from_address,
        })
    }

    pub fn send_password_reset_email(&self, to_email: &str, reset_token: &str) -> Result<()> {
        if env::var("SMTP_SKIP_SEND").unwrap_or_default() == "true" {
            return Ok(());
        }
        let reset_url = format!(
            "{}/reset-password?token={}",
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            reset_token
        );

        let body = format!(
            r#"
We received a request to reset your Tasknest password.

Open the link below to choose a new password:

{}

Only the most recent reset link is valid, and it can be used once.

If you did not request this, you can safely ignore this email.

---
Tasknest
"#,
            reset_url
        );

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to_email.parse()?)
            .subject("Password reset request - Tasknest")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(&email)?;
        Ok(())
    }
}
