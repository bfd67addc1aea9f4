//! Presence companion
//!
//! Reads a channel's presence set and presence history. Constructed
//! eagerly by the owning [`Channel`](crate::Channel) and shares its cipher,
//! so encrypted presence payloads decrypt the same way message history
//! does.

use crate::error::Result;
use crate::http::Transport;
use crate::model::{ChannelCipher, PresenceMessage};
use crate::pagination::{PageRequest, PaginatedResult};
use std::sync::Arc;

/// Presence operations for one channel
#[derive(Clone)]
pub struct Presence {
    transport: Arc<dyn Transport>,
    channel_path: String,
    cipher: Option<ChannelCipher>,
}

impl Presence {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        channel_path: String,
        cipher: Option<ChannelCipher>,
    ) -> Self {
        Self {
            transport,
            channel_path,
            cipher,
        }
    }

    /// Retrieve the channel's current presence set.
    pub async fn get(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<PaginatedResult<PresenceMessage>> {
        let request = PageRequest::new(
            Arc::clone(&self.transport),
            format!("{}/presence", self.channel_path),
            params,
            self.cipher.clone(),
        );
        PaginatedResult::fetch(request).await
    }

    /// Retrieve the channel's presence history.
    pub async fn history(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<PaginatedResult<PresenceMessage>> {
        let request = PageRequest::new(
            Arc::clone(&self.transport),
            format!("{}/presence/history", self.channel_path),
            params,
            self.cipher.clone(),
        );
        PaginatedResult::fetch(request).await
    }
}

impl std::fmt::Debug for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presence")
            .field("channel_path", &self.channel_path)
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}
