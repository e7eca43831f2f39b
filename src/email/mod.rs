use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::EmailConfig,
    domain::{Booking, PayoutReceipt, Vendor},
    error::{AppError, Result},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::Internal(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Validation(format!("Invalid recipient: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::External(format!("SMTP error: {}", e)))?;

        Ok(())
    }
}

fn dollars(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn payout_notification(vendor: &Vendor, booking: &Booking, receipt: &PayoutReceipt) -> EmailMessage {
    let mut body = format!(
        "Hi {},\n\nWe've sent {} to your connected account for your {} booking",
        vendor.business_name,
        dollars(receipt.transfer_amount),
        booking.service_type,
    );
    if let Some(date) = booking.event_date {
        body.push_str(&format!(" on {}", date.format("%B %-d, %Y")));
    }
    body.push_str(".\n");
    if receipt.payment.tip > 0 {
        body.push_str(&format!(
            "This includes a {} tip from the couple.\n",
            dollars(receipt.payment.tip)
        ));
    }
    body.push_str(&format!("\nTransfer reference: {}\n", receipt.transfer_id));

    EmailMessage {
        to: vendor.email.clone(),
        subject: format!("Payout sent: {}", dollars(receipt.transfer_amount)),
        body,
    }
}
