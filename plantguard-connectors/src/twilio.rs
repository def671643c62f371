//! Twilio Messages API transport (SMS and WhatsApp)
//!
//! One form POST per alert to `Accounts/{sid}/Messages.json` with basic
//! auth. The provider's message `sid` is returned as the message id.
//! Failures are never retried here; the caller decides.

use log::{info, warn};

use plantguard_core::{
    errors::TransportError,
    traits::{MessageId, NotificationTransport},
};

use crate::{
    http::{HttpClient, HttpConfig},
    ConnectionStats, ConnectorError,
};

/// Public API root
pub const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

/// Sends alerts through Twilio
pub struct TwilioTransport {
    client: HttpClient,
    account_sid: String,
    from: String,
}

impl TwilioTransport {
    /// Transport for an account, sending from `from`
    pub fn new(account_sid: &str, auth_token: &str, from: &str) -> Result<Self, ConnectorError> {
        Self::with_api_root(TWILIO_API, account_sid, auth_token, from)
    }

    /// Same as [`new`](Self::new) against another API root
    pub fn with_api_root(
        api_root: &str,
        account_sid: &str,
        auth_token: &str,
        from: &str,
    ) -> Result<Self, ConnectorError> {
        if account_sid.is_empty() || from.is_empty() {
            return Err(ConnectorError::Config("account sid and sender are required".into()));
        }

        let config = HttpConfig::new(api_root).basic_auth(account_sid, auth_token);
        Ok(Self {
            client: HttpClient::new(config)?,
            account_sid: account_sid.to_string(),
            from: from.to_string(),
        })
    }

    /// Request counters
    pub fn stats(&self) -> &ConnectionStats {
        self.client.stats()
    }

    fn post_message(&mut self, to: &str, body: &str) -> Result<MessageId, ConnectorError> {
        let path = format!("/Accounts/{}/Messages.json", self.account_sid);
        let response = self
            .client
            .post_form(&path, &[("To", to), ("From", self.from.as_str()), ("Body", body)])?;

        let sid = response
            .get("sid")
            .and_then(|sid| sid.as_str())
            .ok_or_else(|| ConnectorError::Decode("response has no message sid".into()))?;
        MessageId::try_from(sid).map_err(|_| ConnectorError::Decode(format!("message sid too long: {}", sid)))
    }
}

impl NotificationTransport for TwilioTransport {
    fn send(&mut self, to: &str, body: &str) -> Result<MessageId, TransportError> {
        match self.post_message(to, body) {
            Ok(sid) => {
                info!("Message {} queued for {}", sid, to);
                Ok(sid)
            }
            Err(e) => {
                warn!("Message to {} failed: {}", to, e);
                Err(e.into())
            }
        }
    }
}
