//! Push device registration admin
//!
//! Create, read, and list device registrations under
//! `/push/deviceRegistrations`. Listings flow through the same pagination
//! core as channel history, without a cipher.

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::model::DeviceDetails;
use crate::pagination::{PageRequest, PaginatedResult};
use crate::types::StringMap;
use std::sync::Arc;

/// Admin operations on push device registrations
#[derive(Clone)]
pub struct PushDeviceRegistrations {
    transport: Arc<dyn Transport>,
}

impl PushDeviceRegistrations {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create or update a device registration. Returns the server's view of
    /// the registration.
    pub async fn save(&self, device: &DeviceDetails) -> Result<DeviceDetails> {
        let id = device
            .id
            .as_deref()
            .ok_or_else(|| Error::config("device id is required to save a registration"))?;

        let response = self
            .transport
            .put(
                &format!("/push/deviceRegistrations/{id}"),
                &StringMap::new(),
                device.to_record()?,
            )
            .await?;

        let body = response
            .body
            .ok_or_else(|| Error::schema("empty response body for saved device"))?;
        DeviceDetails::from_record(&body)
    }

    /// Fetch one device registration by id. A device the service does not
    /// know surfaces as the transport's not-found error.
    pub async fn get(&self, device_id: &str) -> Result<DeviceDetails> {
        let response = self
            .transport
            .get(
                &format!("/push/deviceRegistrations/{device_id}"),
                &StringMap::new(),
                &[],
            )
            .await?;

        let body = response
            .body
            .ok_or_else(|| Error::schema("empty response body for device"))?;
        DeviceDetails::from_record(&body)
    }

    /// List device registrations, filtered by the given parameters
    /// (e.g. `deviceId`, `clientId`, `limit`).
    pub async fn list(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<PaginatedResult<DeviceDetails>> {
        let request = PageRequest::new(
            Arc::clone(&self.transport),
            "/push/deviceRegistrations",
            params,
            None,
        );
        PaginatedResult::fetch(request).await
    }
}

impl std::fmt::Debug for PushDeviceRegistrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushDeviceRegistrations").finish()
    }
}
