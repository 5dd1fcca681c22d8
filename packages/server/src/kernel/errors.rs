use thiserror::Error;

/// Errors from the persistent stores (extract jobs, request history)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from outbound mail delivery
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail relay address: {0}")]
    Relay(String),

    #[error("Invalid address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Mail rejected: {0}")]
    Rejected(String),
}
