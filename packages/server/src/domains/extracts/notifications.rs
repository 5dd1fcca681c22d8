//! E-mail templates for extract job outcomes.

use super::outcome::JobOutcome;

const SUCCESS_SUBJECT: &str = "NMWRAP Data Extract";
const ALERT_SUBJECT: &str = "NMWRAP Data Extract Alert!";

const SUCCESS_BODY: &str = r#"<!DOCTYPE html>
<html>
<body>
<h3>Your NMWRAP data extract is ready.</h3>
<p>Download your data here: <a href="$dlurl">$dlurl</a></p>
<p>The download link will expire after a limited time.</p>
</body>
</html>"#;

const ALERT_BODY: &str = r#"<!DOCTYPE html>
<html>
<body>
<h3>NMWRAP Data Extract</h3>
<p>$message</p>
</body>
</html>"#;

/// One template per outcome. Substitutions travel with the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTemplate {
    Success { download_url: String },
    Failure,
    Timeout,
    Cancelled,
    Deleted,
    InternalError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: &'static str,
    pub html_body: String,
}

impl NotificationTemplate {
    /// Template to send for a poll outcome. `None` for non-terminal outcomes.
    pub fn for_outcome(outcome: &JobOutcome) -> Option<Self> {
        match outcome {
            JobOutcome::Succeeded { result_url } => Some(Self::Success {
                download_url: result_url.clone(),
            }),
            JobOutcome::Failed => Some(Self::Failure),
            JobOutcome::TimedOut => Some(Self::Timeout),
            JobOutcome::Cancelled => Some(Self::Cancelled),
            JobOutcome::Deleted => Some(Self::Deleted),
            JobOutcome::Pending | JobOutcome::PollError(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure => "failure",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Deleted => "deleted",
            Self::InternalError { .. } => "internal-error",
        }
    }

    pub fn render(&self) -> RenderedMail {
        match self {
            Self::Success { download_url } => RenderedMail {
                subject: SUCCESS_SUBJECT,
                html_body: SUCCESS_BODY.replace("$dlurl", &escape_html(download_url)),
            },
            Self::Failure => alert("I am sorry to inform you that your extract job has failed."),
            Self::Timeout => alert("I am sorry to inform you that your extract job has timed out."),
            Self::Cancelled => alert(
                "I am sorry to inform you that your extract job has been cancelled by an admin.",
            ),
            Self::Deleted => alert("I am sorry to inform you that your extract job has been deleted."),
            Self::InternalError { message } => alert(message),
        }
    }
}

fn alert(message: &str) -> RenderedMail {
    RenderedMail {
        subject: ALERT_SUBJECT,
        html_body: ALERT_BODY.replace("$message", &escape_html(message)),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_outcomes_map_to_templates() {
        assert_eq!(
            NotificationTemplate::for_outcome(&JobOutcome::Succeeded {
                result_url: "https://host/out.zip".to_string()
            }),
            Some(NotificationTemplate::Success {
                download_url: "https://host/out.zip".to_string()
            })
        );
        assert_eq!(
            NotificationTemplate::for_outcome(&JobOutcome::Failed),
            Some(NotificationTemplate::Failure)
        );
        assert_eq!(
            NotificationTemplate::for_outcome(&JobOutcome::TimedOut),
            Some(NotificationTemplate::Timeout)
        );
        assert_eq!(
            NotificationTemplate::for_outcome(&JobOutcome::Cancelled),
            Some(NotificationTemplate::Cancelled)
        );
        assert_eq!(
            NotificationTemplate::for_outcome(&JobOutcome::Deleted),
            Some(NotificationTemplate::Deleted)
        );
    }

    #[test]
    fn pending_has_no_template() {
        assert_eq!(NotificationTemplate::for_outcome(&JobOutcome::Pending), None);
    }

    #[test]
    fn success_mail_embeds_download_link() {
        let mail = NotificationTemplate::Success {
            download_url: "https://host/out.zip?a=1&b=2".to_string(),
        }
        .render();
        assert_eq!(mail.subject, "NMWRAP Data Extract");
        assert!(mail.html_body.contains("https://host/out.zip?a=1&amp;b=2"));
        assert!(!mail.html_body.contains("$dlurl"));
    }

    #[test]
    fn alerts_share_subject() {
        let mail = NotificationTemplate::Cancelled.render();
        assert_eq!(mail.subject, "NMWRAP Data Extract Alert!");
        assert!(mail.html_body.contains("cancelled by an admin"));
    }

    #[test]
    fn internal_error_message_is_escaped() {
        let mail = NotificationTemplate::InternalError {
            message: "<script>".to_string(),
        }
        .render();
        assert!(mail.html_body.contains("&lt;script&gt;"));
    }
}
