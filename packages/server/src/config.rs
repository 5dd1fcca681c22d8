use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::extracts::policy::{DeliveryPolicy, SweepPolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gp_service_url: String,
    pub gp_result_param: String,
    pub gp_request_timeout: Duration,
    pub smtp_relay: String,
    pub mail_from: String,
    pub admin_email: Option<String>,
    pub sweep_interval: Duration,
    pub sweep_policy: SweepPolicy,
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let sweep_concurrency: usize = env::var("SWEEP_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .context("SWEEP_CONCURRENCY must be a valid number")?;

        let max_job_age = match env::var("MAX_JOB_AGE_HOURS") {
            Ok(hours) => Some(parse_max_job_age(&hours)?),
            Err(_) => None,
        };

        let delivery: DeliveryPolicy = env::var("NOTIFICATION_DELIVERY")
            .unwrap_or_else(|_| "at_most_once".to_string())
            .parse()
            .context("NOTIFICATION_DELIVERY must be at_most_once or at_least_once")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gp_service_url: env::var("GP_SERVICE_URL").context("GP_SERVICE_URL must be set")?,
            gp_result_param: env::var("GP_RESULT_PARAM")
                .unwrap_or_else(|_| "Output_Zip_File".to_string()),
            gp_request_timeout: Duration::from_secs(
                env::var("GP_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("GP_REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
            smtp_relay: env::var("SMTP_RELAY").context("SMTP_RELAY must be set")?,
            mail_from: env::var("MAIL_FROM").context("MAIL_FROM must be set")?,
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|s| !s.trim().is_empty()),
            sweep_interval: parse_sweep_interval(
                &env::var("SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "60".to_string()),
            )?,
            sweep_policy: SweepPolicy {
                max_job_age,
                delivery,
                concurrency: sweep_concurrency.max(1),
            },
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "nmwrap".to_string()),
        })
    }
}

fn parse_max_job_age(hours: &str) -> Result<Duration> {
    let secs = hours
        .trim()
        .parse::<u64>()
        .context("MAX_JOB_AGE_HOURS must be a valid number")?
        .checked_mul(3600)
        .context("MAX_JOB_AGE_HOURS is too large")?;
    Ok(Duration::from_secs(secs))
}

fn parse_sweep_interval(secs: &str) -> Result<Duration> {
    let secs: u64 = secs
        .trim()
        .parse()
        .context("SWEEP_INTERVAL_SECS must be a valid number")?;
    ensure!(secs > 0, "SWEEP_INTERVAL_SECS must be greater than zero");
    Ok(Duration::from_secs(secs))
}
