//! Grouping & dispatch: partition selected contacts by tone -> one rephrase per tone -> one send per tone.
//!
//! - Groups are processed strictly one after another, in first-seen order
//! - Each member contributes only its first phone number; groups left with no recipients are skipped
//! - The first rephrase or send failure halts the run; groups already sent stay sent

use crate::domain::{
    Contact, DispatchReport, DomainError, GroupOutcome, RewrittenMessage, group_by_tone,
};
use crate::ports::{AiPort, SmsPort};
use std::sync::Arc;
use tracing::{info, warn};

/// Dispatch service. Coordinates the AI rephraser and the SMS sender.
pub struct DispatchService {
    ai: Arc<dyn AiPort>,
    sms: Arc<dyn SmsPort>,
}

impl DispatchService {
    pub fn new(ai: Arc<dyn AiPort>, sms: Arc<dyn SmsPort>) -> Self {
        Self { ai, sms }
    }

    /// Rephrase `draft` once per tone present in `selected` and send each version to its group.
    ///
    /// Callers must not invoke this with an empty draft or selection (see `Session::can_dispatch`).
    pub async fn dispatch(
        &self,
        draft: &str,
        selected: &[Contact],
    ) -> Result<DispatchReport, DomainError> {
        if !self.sms.is_available().await {
            return Err(DomainError::SmsUnavailable(
                "no SMS sender is configured on this device".into(),
            ));
        }

        let groups = group_by_tone(selected);
        info!(
            contacts = selected.len(),
            groups = groups.len(),
            "starting dispatch"
        );

        let mut report = DispatchReport::default();
        for group in groups {
            let label = group.label.clone();
            let halt = |reason: String, sent: usize| DomainError::Dispatch {
                label: label.to_string(),
                groups_sent: sent,
                reason,
            };

            let text = self
                .ai
                .rephrase(draft, &group.label)
                .await
                .map_err(|e| halt(e.to_string(), report.sends()))?;
            let message = RewrittenMessage {
                label: group.label.clone(),
                text,
            };

            let recipients = group.recipients();
            if recipients.is_empty() {
                warn!(
                    label = %group.label,
                    members = group.members.len(),
                    "no member has a phone number; skipping group"
                );
                report.groups.push(GroupOutcome {
                    message,
                    recipients,
                    sent: false,
                });
                continue;
            }

            self.sms
                .send(&recipients, &message.text)
                .await
                .map_err(|e| halt(e.to_string(), report.sends()))?;
            info!(
                label = %group.label,
                recipients = recipients.len(),
                "group dispatched"
            );
            report.groups.push(GroupOutcome {
                message,
                recipients,
                sent: true,
            });
        }

        info!(
            sends = report.sends(),
            recipients = report.recipients(),
            "dispatch complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToneLabel;
    use std::sync::Mutex;

    /// Shared, ordered record of every collaborator call.
    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeAi {
        log: CallLog,
        fail_on: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl AiPort for FakeAi {
        async fn rephrase(&self, original: &str, label: &ToneLabel) -> Result<String, DomainError> {
            self.log.lock().unwrap().push(format!("rephrase:{}", label));
            if self.fail_on == Some(label.as_str()) {
                return Err(DomainError::Ai("provider down".into()));
            }
            Ok(format!("[{}] {}", label, original))
        }

        async fn conversation_starter(&self, _bio: &str) -> Result<String, DomainError> {
            unreachable!("not used by dispatch")
        }
    }

    struct FakeSms {
        log: CallLog,
        available: bool,
        fail_on_body_prefix: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl SmsPort for FakeSms {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn send(&self, recipients: &[String], body: &str) -> Result<(), DomainError> {
            if let Some(prefix) = self.fail_on_body_prefix {
                if body.starts_with(prefix) {
                    return Err(DomainError::Sms("carrier rejected".into()));
                }
            }
            self.log
                .lock()
                .unwrap()
                .push(format!("send:{}:{}", recipients.join(","), body));
            Ok(())
        }
    }

    fn contact(id: &str, tone: &str, phones: &[&str]) -> Contact {
        Contact {
            id: id.to_string(),
            display_name: id.to_string(),
            phone_numbers: phones.iter().map(|p| p.to_string()).collect(),
            avatar: None,
            tone: ToneLabel::new(tone),
        }
    }

    fn service(
        fail_ai: Option<&'static str>,
        fail_sms: Option<&'static str>,
    ) -> (DispatchService, CallLog) {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let ai = Arc::new(FakeAi {
            log: Arc::clone(&log),
            fail_on: fail_ai,
        });
        let sms = Arc::new(FakeSms {
            log: Arc::clone(&log),
            available: true,
            fail_on_body_prefix: fail_sms,
        });
        (DispatchService::new(ai, sms), log)
    }

    fn calls(log: &CallLog, prefix: &str) -> Vec<String> {
        log.lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_one_rephrase_and_one_send_per_tone() {
        let (svc, log) = service(None, None);
        let selected = vec![
            contact("a", "Formal", &["+1"]),
            contact("b", "Formal", &["+2"]),
            contact("c", "Casual", &["+3"]),
        ];

        let report = svc.dispatch("See you at 6", &selected).await.unwrap();

        assert_eq!(
            calls(&log, "rephrase:"),
            vec!["rephrase:Formal", "rephrase:Casual"]
        );
        assert_eq!(
            calls(&log, "send:"),
            vec![
                "send:+1,+2:[Formal] See you at 6",
                "send:+3:[Casual] See you at 6"
            ]
        );
        assert_eq!(report.sends(), 2);
        assert_eq!(report.recipients(), 3);
    }

    #[tokio::test]
    async fn test_phoneless_members_are_excluded() {
        let (svc, log) = service(None, None);
        let selected = vec![
            contact("a", "Polite", &[]),
            contact("b", "Polite", &["+2", "+22"]),
        ];

        let report = svc.dispatch("hi", &selected).await.unwrap();

        assert_eq!(calls(&log, "send:"), vec!["send:+2:[Polite] hi"]);
        assert_eq!(report.groups[0].recipients, vec!["+2"]);
    }

    #[tokio::test]
    async fn test_group_without_numbers_is_not_sent() {
        let (svc, log) = service(None, None);
        let selected = vec![
            contact("a", "Casual", &[]),
            contact("b", "Technical", &["+2"]),
        ];

        let report = svc.dispatch("hi", &selected).await.unwrap();

        assert_eq!(calls(&log, "rephrase:").len(), 2);
        assert_eq!(calls(&log, "send:"), vec!["send:+2:[Technical] hi"]);
        assert!(!report.groups[0].sent);
        assert!(report.groups[1].sent);
        assert_eq!(report.sends(), 1);
    }

    #[tokio::test]
    async fn test_rephrase_failure_halts_after_earlier_sends() {
        let (svc, log) = service(Some("Casual"), None);
        let selected = vec![
            contact("a", "Formal", &["+1"]),
            contact("b", "Casual", &["+2"]),
            contact("c", "Humorous", &["+3"]),
        ];

        let err = svc.dispatch("hi", &selected).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::Dispatch { ref label, groups_sent: 1, .. } if label == "Casual"
        ));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "rephrase:Formal".to_string(),
                "send:+1:[Formal] hi".to_string(),
                "rephrase:Casual".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_failure_halts_remaining_groups() {
        let (svc, log) = service(None, Some("[Casual]"));
        let selected = vec![
            contact("a", "Casual", &["+1"]),
            contact("b", "Formal", &["+2"]),
        ];

        let err = svc.dispatch("hi", &selected).await.unwrap_err();

        assert!(matches!(err, DomainError::Dispatch { groups_sent: 0, .. }));
        assert_eq!(calls(&log, "rephrase:"), vec!["rephrase:Casual"]);
        assert!(calls(&log, "send:").is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_sms_sends_nothing() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let svc = DispatchService::new(
            Arc::new(FakeAi {
                log: Arc::clone(&log),
                fail_on: None,
            }),
            Arc::new(FakeSms {
                log: Arc::clone(&log),
                available: false,
                fail_on_body_prefix: None,
            }),
        );

        let err = svc
            .dispatch("hi", &[contact("a", "Formal", &["+1"])])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::SmsUnavailable(_)));
        assert!(log.lock().unwrap().is_empty());
    }
}
