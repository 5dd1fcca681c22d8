//! Retry and delivery policy for the extract job sweep.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// What happens to a terminal job's record when its notification fails to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Delete the record after the attempt, whatever the outcome.
    /// A failed send loses that notification.
    #[default]
    AtMostOnce,
    /// Keep the record when the send fails; the next sweep re-polls and retries.
    AtLeastOnce,
}

impl FromStr for DeliveryPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "at_most_once" => Ok(Self::AtMostOnce),
            "at_least_once" => Ok(Self::AtLeastOnce),
            other => anyhow::bail!("unknown notification delivery policy: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SweepPolicy {
    /// `None` polls a job until the service reports a terminal status.
    pub max_job_age: Option<Duration>,
    pub delivery: DeliveryPolicy,
    /// Maximum polls in flight within one sweep
    pub concurrency: usize,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            max_job_age: None,
            delivery: DeliveryPolicy::AtMostOnce,
            concurrency: 8,
        }
    }
}

impl SweepPolicy {
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let Some(max_age) = self.max_job_age else {
            return false;
        };
        match (now - created_at).to_std() {
            Ok(age) => age > max_age,
            // created_at in the future (clock skew)
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delivery_policy() {
        assert_eq!(
            "at_least_once".parse::<DeliveryPolicy>().unwrap(),
            DeliveryPolicy::AtLeastOnce
        );
        assert_eq!(
            "AT_MOST_ONCE".parse::<DeliveryPolicy>().unwrap(),
            DeliveryPolicy::AtMostOnce
        );
        assert!("exactly_once".parse::<DeliveryPolicy>().is_err());
    }

    #[test]
    fn unbounded_policy_never_expires() {
        let policy = SweepPolicy::default();
        let created = Utc::now() - chrono::Duration::days(365);
        assert!(!policy.is_expired(created, Utc::now()));
    }

    #[test]
    fn bounded_policy_expires_old_jobs() {
        let policy = SweepPolicy {
            max_job_age: Some(Duration::from_secs(3600)),
            ..SweepPolicy::default()
        };
        let now = Utc::now();
        assert!(policy.is_expired(now - chrono::Duration::hours(2), now));
        assert!(!policy.is_expired(now - chrono::Duration::minutes(30), now));
        assert!(!policy.is_expired(now + chrono::Duration::minutes(5), now));
    }
}
