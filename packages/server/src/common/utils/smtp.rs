use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::kernel::MailError;

const DEFAULT_SMTP_PORT: u16 = 25;

/// SMTP client that hands mail to a smart-host relay.
/// Plain SMTP without authentication or TLS.
#[derive(Clone)]
pub struct SmtpClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpClient {
    /// `relay` is `host` or `host:port`
    pub fn new(relay: &str, from: &str) -> Result<Self, MailError> {
        let (host, port) = parse_relay(relay)?;
        let from = parse_mailbox(from)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self { transport, from })
    }

    /// Send an HTML message to a single recipient
    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?;

        debug!("Sending mail '{}' to {}", subject, to);

        self.transport.send(message).await?;

        info!("Mail '{}' sent to {}", subject, to);
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| MailError::Address {
            address: address.to_string(),
            source,
        })
}

fn parse_relay(relay: &str) -> Result<(&str, u16), MailError> {
    let relay = relay.trim();
    match relay.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => {
            let port = port
                .parse::<u16>()
                .map_err(|_| MailError::Relay(relay.to_string()))?;
            Ok((host, port))
        }
        Some(_) => Err(MailError::Relay(relay.to_string())),
        None if !relay.is_empty() => Ok((relay, DEFAULT_SMTP_PORT)),
        None => Err(MailError::Relay(relay.to_string())),
    }
}
