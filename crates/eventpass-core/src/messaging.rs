//! Messaging records: templates, scheduled messages, delivery history,
//! and automated notifications.
//!
//! Every record carries the `event_id` that owns it. The contexts filter
//! on that field instead of keeping per-event indices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::time::MILLIS_PER_HOUR;
use crate::types::{AttendeeId, EventId, HistoryId, MessageId, NotificationId, TemplateId};

/// Delivery channel for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    #[default]
    Email,
    Sms,
    Push,
}

/// A reusable message body for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: TemplateId,
    pub event_id: EventId,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub channel: MessageChannel,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MessageTemplate {
    /// Create a template with a fresh id.
    pub fn new(
        event_id: EventId,
        name: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        channel: MessageChannel,
        now: i64,
    ) -> Self {
        Self {
            id: TemplateId::generate(),
            event_id,
            name: name.into(),
            subject: subject.into(),
            body: body.into(),
            channel,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Someone a message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub attendee_id: AttendeeId,
    pub name: String,
    /// Email address, phone number, or push token, depending on channel.
    pub contact: String,
}

impl Recipient {
    pub fn new(
        attendee_id: impl Into<AttendeeId>,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            attendee_id: attendee_id.into(),
            name: name.into(),
            contact: contact.into(),
        }
    }
}

/// Lifecycle of a scheduled message.
///
/// ```text
/// draft ⇄ scheduled ──► sending ──► sent
///   └──────────────────►   │
///                          └──────► failed ──► scheduled (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Draft,
    Scheduled,
    Sending,
    Sent,
    Failed,
}

impl MessageStatus {
    /// Check whether a move to `next` is allowed.
    pub fn can_transition_to(self, next: MessageStatus) -> bool {
        use MessageStatus::*;
        matches!(
            (self, next),
            (Draft, Scheduled)
                | (Scheduled, Draft)
                | (Draft, Sending)
                | (Scheduled, Sending)
                | (Sending, Sent)
                | (Sending, Failed)
                | (Failed, Scheduled)
        )
    }

    /// Move to `next`, or report why not.
    pub fn transition(self, next: MessageStatus) -> Result<MessageStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidMessageTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Content may only change before sending starts.
    pub fn is_editable(self) -> bool {
        matches!(self, MessageStatus::Draft | MessageStatus::Scheduled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Draft => "draft",
            MessageStatus::Scheduled => "scheduled",
            MessageStatus::Sending => "sending",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message queued for one or more recipients of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessage {
    pub id: MessageId,
    pub event_id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    pub subject: String,
    pub body: String,
    pub channel: MessageChannel,
    pub recipients: Vec<Recipient>,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<i64>,
    #[serde(default)]
    pub sent_count: u32,
    #[serde(default)]
    pub failed_count: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ScheduledMessage {
    /// Create a draft message with a fresh id.
    pub fn draft(
        event_id: EventId,
        subject: impl Into<String>,
        body: impl Into<String>,
        channel: MessageChannel,
        recipients: Vec<Recipient>,
        now: i64,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            event_id,
            template_id: None,
            subject: subject.into(),
            body: body.into(),
            channel,
            recipients,
            status: MessageStatus::Draft,
            scheduled_for: None,
            sent_at: None,
            sent_count: 0,
            failed_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a draft from a template's subject, body, and channel.
    pub fn from_template(template: &MessageTemplate, recipients: Vec<Recipient>, now: i64) -> Self {
        let mut message = Self::draft(
            template.event_id.clone(),
            template.subject.clone(),
            template.body.clone(),
            template.channel,
            recipients,
            now,
        );
        message.template_id = Some(template.id.clone());
        message
    }

    /// Set a send time; the message starts out `scheduled`.
    pub fn scheduled_for(mut self, at: i64) -> Self {
        self.scheduled_for = Some(at);
        self.status = MessageStatus::Scheduled;
        self
    }
}

/// Outcome of delivering to one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Append-only delivery record, one per recipient per send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHistory {
    pub id: HistoryId,
    pub event_id: EventId,
    pub message_id: MessageId,
    pub recipient: Recipient,
    pub channel: MessageChannel,
    pub status: DeliveryStatus,
    pub sent_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What an automated notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PurchaseConfirmation,
    EventReminder,
    CheckInConfirmation,
}

/// When an automated notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum NotificationTrigger {
    /// Fires as soon as the triggering action happens.
    Immediate,
    /// Fires a number of hours before the event starts.
    BeforeEvent {
        #[serde(rename = "triggerHours")]
        trigger_hours: u32,
    },
}

impl NotificationTrigger {
    /// Fire time for an event starting at `starts_at`.
    ///
    /// `Immediate` triggers have no fixed time.
    pub fn fire_at(&self, starts_at: i64) -> Option<i64> {
        match self {
            NotificationTrigger::Immediate => None,
            NotificationTrigger::BeforeEvent { trigger_hours } => {
                Some(starts_at.saturating_sub(i64::from(*trigger_hours) * MILLIS_PER_HOUR))
            }
        }
    }
}

/// A notification sent automatically on a trigger, seeded per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedNotification {
    pub id: NotificationId,
    pub event_id: EventId,
    pub kind: NotificationKind,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub channel: MessageChannel,
    #[serde(flatten)]
    pub trigger: NotificationTrigger,
    pub enabled: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AutomatedNotification {
    /// The fixed set every event starts with.
    ///
    /// Purchase confirmation, reminders 24 and 1 hours out, and check-in
    /// confirmation. All enabled, all email.
    pub fn defaults_for(event_id: &EventId, now: i64) -> Vec<AutomatedNotification> {
        let make = |kind, name: &str, subject: &str, body: &str, trigger| AutomatedNotification {
            id: NotificationId::generate(),
            event_id: event_id.clone(),
            kind,
            name: name.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            channel: MessageChannel::Email,
            trigger,
            enabled: true,
            created_at: now,
            updated_at: now,
        };

        vec![
            make(
                NotificationKind::PurchaseConfirmation,
                "Purchase confirmation",
                "Your tickets for {{event_name}}",
                "Hi {{attendee_name}}, thanks for your purchase. Your tickets are attached.",
                NotificationTrigger::Immediate,
            ),
            make(
                NotificationKind::EventReminder,
                "Reminder: 24 hours",
                "{{event_name}} is tomorrow",
                "Hi {{attendee_name}}, {{event_name}} starts in 24 hours. See you there!",
                NotificationTrigger::BeforeEvent { trigger_hours: 24 },
            ),
            make(
                NotificationKind::EventReminder,
                "Reminder: 1 hour",
                "{{event_name}} starts soon",
                "Hi {{attendee_name}}, {{event_name}} starts in one hour.",
                NotificationTrigger::BeforeEvent { trigger_hours: 1 },
            ),
            make(
                NotificationKind::CheckInConfirmation,
                "Check-in confirmation",
                "Welcome to {{event_name}}",
                "Hi {{attendee_name}}, you're checked in. Enjoy the event!",
                NotificationTrigger::Immediate,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lifecycle() {
        let status = MessageStatus::Draft;
        let status = status.transition(MessageStatus::Scheduled).unwrap();
        let status = status.transition(MessageStatus::Sending).unwrap();
        let status = status.transition(MessageStatus::Sent).unwrap();

        assert_eq!(status, MessageStatus::Sent);
        assert!(!status.is_editable());
    }

    #[test]
    fn test_sent_is_terminal() {
        for next in [
            MessageStatus::Draft,
            MessageStatus::Scheduled,
            MessageStatus::Sending,
            MessageStatus::Failed,
        ] {
            assert!(!MessageStatus::Sent.can_transition_to(next));
        }
    }

    #[test]
    fn test_failed_can_be_rescheduled() {
        assert!(MessageStatus::Failed.can_transition_to(MessageStatus::Scheduled));
        assert_eq!(
            MessageStatus::Draft.transition(MessageStatus::Sent),
            Err(CoreError::InvalidMessageTransition {
                from: MessageStatus::Draft,
                to: MessageStatus::Sent,
            })
        );
    }

    #[test]
    fn test_trigger_json_layout() {
        let event_id = EventId::new("evt-1");
        let defaults = AutomatedNotification::defaults_for(&event_id, 1000);
        let value = serde_json::to_value(&defaults[1]).unwrap();

        assert_eq!(value["trigger"], "before_event");
        assert_eq!(value["triggerHours"], 24);
        assert_eq!(value["eventId"], "evt-1");

        let immediate = serde_json::to_value(&defaults[0]).unwrap();
        assert_eq!(immediate["trigger"], "immediate");
        assert!(immediate.get("triggerHours").is_none());

        let back: AutomatedNotification = serde_json::from_value(value).unwrap();
        assert_eq!(back, defaults[1]);
    }

    #[test]
    fn test_defaults_cover_four_slots() {
        let defaults = AutomatedNotification::defaults_for(&EventId::new("evt-1"), 0);
        let kinds: Vec<_> = defaults.iter().map(|n| n.kind).collect();

        assert_eq!(
            kinds,
            vec![
                NotificationKind::PurchaseConfirmation,
                NotificationKind::EventReminder,
                NotificationKind::EventReminder,
                NotificationKind::CheckInConfirmation,
            ]
        );
        assert!(defaults.iter().all(|n| n.enabled));
    }

    #[test]
    fn test_fire_at() {
        let starts_at = 10 * MILLIS_PER_HOUR;
        let trigger = NotificationTrigger::BeforeEvent { trigger_hours: 2 };

        assert_eq!(trigger.fire_at(starts_at), Some(8 * MILLIS_PER_HOUR));
        assert_eq!(NotificationTrigger::Immediate.fire_at(starts_at), None);
    }

    #[test]
    fn test_from_template_copies_content() {
        let template = MessageTemplate::new(
            EventId::new("evt-1"),
            "Welcome",
            "Hello",
            "Body",
            MessageChannel::Sms,
            5,
        );
        let message = ScheduledMessage::from_template(&template, vec![], 6);

        assert_eq!(message.template_id.as_ref(), Some(&template.id));
        assert_eq!(message.channel, MessageChannel::Sms);
        assert_eq!(message.status, MessageStatus::Draft);
    }
}
