//! Notification transport interface

use heapless::String;

use crate::{
    constants::{MAX_MESSAGE_ID, MAX_PHONE_NUMBER},
    errors::TransportError,
};

/// Destination number, e.g. `+447700900123` or `whatsapp:+447700900123`
pub type PhoneNumber = String<MAX_PHONE_NUMBER>;

/// Provider id of an accepted message
pub type MessageId = String<MAX_MESSAGE_ID>;

/// SMS / WhatsApp sender
pub trait NotificationTransport {
    /// Send `body` to `to`
    fn send(&mut self, to: &str, body: &str) -> Result<MessageId, TransportError>;
}
