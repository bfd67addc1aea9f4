//! Push device registration model

use crate::error::{Error, Result};
use crate::model::ChannelCipher;
use crate::pagination::PageItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Details of a device registered for push notifications.
///
/// Registration records are never encrypted, so the cipher hook is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceDetails {
    /// Device id, chosen by the registering application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Client id the device acts as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Device platform, e.g. `ios` or `android`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Device form factor, e.g. `phone` or `tablet`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    /// Secret used to authenticate device-level operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_secret: Option<String>,
    /// Push transport recipient details, opaque to the client
    #[serde(skip_serializing_if = "Value::is_null")]
    pub push: Value,
}

impl DeviceDetails {
    /// Serialize for a registration request
    pub fn to_record(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from one raw server record
    pub fn from_record(record: &Value) -> Result<Self> {
        serde_json::from_value(record.clone())
            .map_err(|e| Error::schema(format!("invalid device record: {e}")))
    }
}

impl PageItem for DeviceDetails {
    fn set_cipher(&mut self, _cipher: ChannelCipher) {}

    fn populate(&mut self, record: &Value) -> Result<()> {
        if !record.is_object() {
            return Err(Error::schema("device record is not an object"));
        }
        *self = Self::from_record(record)?;
        Ok(())
    }
}
