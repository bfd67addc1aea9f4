//! Presence message model

use super::cipher::ChannelCipher;
use super::codec::decode_payload;
use crate::error::{Error, Result};
use crate::pagination::PageItem;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

/// Presence state transition carried by a presence message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceAction {
    /// Not present on the channel
    #[default]
    Absent,
    /// Present on the channel
    Present,
    /// Entered the channel
    Enter,
    /// Left the channel
    Leave,
    /// Updated presence data
    Update,
}

impl PresenceAction {
    /// Wire code for this action
    pub fn code(self) -> u8 {
        match self {
            Self::Absent => 0,
            Self::Present => 1,
            Self::Enter => 2,
            Self::Leave => 3,
            Self::Update => 4,
        }
    }

    /// Action for a wire code, if known
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Absent),
            1 => Some(Self::Present),
            2 => Some(Self::Enter),
            3 => Some(Self::Leave),
            4 => Some(Self::Update),
            _ => None,
        }
    }
}

/// One member state change on a channel's presence set.
///
/// Payload handling matches [`Message`](super::Message): encoding chains,
/// including decryption, are undone during population.
#[derive(Debug, Clone, Default)]
pub struct PresenceMessage {
    /// State transition
    pub action: PresenceAction,
    /// Id of the client whose presence changed
    pub client_id: Option<String>,
    /// Decoded payload attached to the state change
    pub data: Option<Value>,
    /// Server timestamp
    pub timestamp: Option<DateTime<Utc>>,
    cipher: Option<ChannelCipher>,
}

impl PageItem for PresenceMessage {
    fn set_cipher(&mut self, cipher: ChannelCipher) {
        self.cipher = Some(Arc::clone(&cipher));
    }

    fn populate(&mut self, record: &Value) -> Result<()> {
        let Some(fields) = record.as_object() else {
            return Err(Error::schema("presence record is not an object"));
        };

        self.action = match fields.get("action").and_then(Value::as_u64) {
            Some(code) => PresenceAction::from_code(code)
                .ok_or_else(|| Error::schema(format!("unknown presence action code {code}")))?,
            None => PresenceAction::default(),
        };
        self.client_id = fields
            .get("clientId")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        self.timestamp = fields
            .get("timestamp")
            .and_then(Value::as_i64)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

        if let Some(data) = fields.get("data") {
            let encoding = fields.get("encoding").and_then(Value::as_str);
            self.data = Some(decode_payload(data, encoding, self.cipher.as_ref())?);
        } else {
            self.data = None;
        }

        Ok(())
    }
}
