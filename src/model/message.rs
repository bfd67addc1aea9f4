//! Channel message model

use super::cipher::ChannelCipher;
use super::codec::{decode_payload, encode_payload};
use crate::error::{Error, Result};
use crate::pagination::PageItem;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

/// One message published to a channel.
///
/// `data` holds the decoded payload: any encoding chain the record arrived
/// with, including decryption, is undone during population. Payload values
/// themselves stay opaque JSON; interpreting them is the application's
/// business.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Event name
    pub name: Option<String>,
    /// Decoded payload
    pub data: Option<Value>,
    /// Id of the publishing client
    pub client_id: Option<String>,
    /// Server timestamp
    pub timestamp: Option<DateTime<Utc>>,
    cipher: Option<ChannelCipher>,
}

impl Message {
    /// Create a message with a name and payload
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: Some(name.into()),
            data: Some(data),
            ..Self::default()
        }
    }

    /// Attach channel cipher parameters
    pub fn set_cipher_params(&mut self, cipher: ChannelCipher) {
        self.cipher = Some(cipher);
    }

    /// Serialize for publishing, encrypting the payload when a cipher is
    /// attached.
    pub fn to_record(&self) -> Result<Value> {
        let mut record = Map::new();
        if let Some(name) = &self.name {
            record.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(data) = &self.data {
            let (encoded, encoding) = encode_payload(data, self.cipher.as_ref())?;
            record.insert("data".to_string(), encoded);
            if let Some(encoding) = encoding {
                record.insert("encoding".to_string(), Value::String(encoding));
            }
        }
        if let Some(client_id) = &self.client_id {
            record.insert("clientId".to_string(), Value::String(client_id.clone()));
        }
        Ok(Value::Object(record))
    }
}

impl PageItem for Message {
    fn set_cipher(&mut self, cipher: ChannelCipher) {
        self.cipher = Some(Arc::clone(&cipher));
    }

    fn populate(&mut self, record: &Value) -> Result<()> {
        let Some(fields) = record.as_object() else {
            return Err(Error::schema("message record is not an object"));
        };

        self.name = fields
            .get("name")
            .and_then(Value::as_str)
            .map(ToString::to_string);
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
