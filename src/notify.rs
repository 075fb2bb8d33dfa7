use serde_json::Value;
use thiserror::Error;

/// Channels a customer can be reached on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Messaging,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Messaging => "messaging",
        }
    }
}

/// Template selector understood by the downstream sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    OrderPlaced,
    OrderStatusChanged,
    OrderCancelled,
    PaymentRecorded,
    PaymentVerified,
    PaymentRejected,
    RefundRecorded,
    ReturnRequested,
    ReturnApproved,
    ReturnRejected,
    QuoteSent,
    CustomRequestReceived,
    CustomRequestCancelled,
    CustomRequestStatusChanged,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderPlaced => "order_placed",
            NotificationKind::OrderStatusChanged => "order_status_changed",
            NotificationKind::OrderCancelled => "order_cancelled",
            NotificationKind::PaymentRecorded => "payment_recorded",
            NotificationKind::PaymentVerified => "payment_verified",
            NotificationKind::PaymentRejected => "payment_rejected",
            NotificationKind::RefundRecorded => "refund_recorded",
            NotificationKind::ReturnRequested => "return_requested",
            NotificationKind::ReturnApproved => "return_approved",
            NotificationKind::ReturnRejected => "return_rejected",
            NotificationKind::QuoteSent => "quote_sent",
            NotificationKind::CustomRequestReceived => "custom_request_received",
            NotificationKind::CustomRequestCancelled => "custom_request_cancelled",
            NotificationKind::CustomRequestStatusChanged => "custom_request_status_changed",
        }
    }
}

/// A single notification intent handed to the downstream sender.
#[derive(Debug, Clone)]
pub struct Notification {
    pub channel: Channel,
    pub recipient: String,
    pub kind: NotificationKind,
    pub payload: Value,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Outbound notification sender. Delivery is best-effort: callers log
/// failures and never treat them as operation failures.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Production stand-in that records every intent in the service log.
/// Actual email/WhatsApp delivery is owned by a separate process that
/// consumes these intents.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        log::info!(
            "notify {} via {}: {} {}",
            notification.recipient,
            notification.channel.as_str(),
            notification.kind.as_str(),
            notification.payload
        );
        Ok(())
    }
}

/// Send `kind` to the customer on both channels, logging any failure.
pub fn notify_customer<N>(
    notifier: &N,
    email: &str,
    phone: &str,
    kind: NotificationKind,
    payload: Value,
) where
    N: Notifier + ?Sized,
{
    for (channel, recipient) in [(Channel::Email, email), (Channel::Messaging, phone)] {
        let notification = Notification {
            channel,
            recipient: recipient.to_string(),
            kind,
            payload: payload.clone(),
        };

        if let Err(err) = notifier.notify(&notification) {
            log::error!(
                "Failed to send {} notification to {recipient}: {err}",
                kind.as_str()
            );
        }
    }
}
