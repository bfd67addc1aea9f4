//! Channel handle
//!
//! A channel names a message stream on the service. The handle publishes
//! to `<path>/messages` and reads history through the pagination core.
//! Channels configured with a cipher encrypt outgoing payloads and decrypt
//! history transparently.

use crate::error::Result;
use crate::http::Transport;
use crate::model::{ChannelCipher, Message};
use crate::pagination::{PageRequest, PaginatedResult};
use crate::presence::Presence;
use crate::types::StringMap;
use serde_json::Value;
use std::sync::Arc;

/// Per-channel options
#[derive(Clone, Debug, Default)]
pub struct ChannelOptions {
    /// Cipher for payload encryption; `None` means the channel is plaintext
    pub cipher: Option<ChannelCipher>,
}

impl ChannelOptions {
    /// Options for an encrypted channel
    pub fn encrypted(cipher: ChannelCipher) -> Self {
        Self {
            cipher: Some(cipher),
        }
    }
}

/// Input to [`Channel::publish`]: either a prepared message or bare
/// name-and-data fields.
#[derive(Debug, Clone)]
pub enum PublishPayload {
    /// A fully-formed message
    Message(Message),
    /// Event name and payload, wrapped into a message at the boundary
    Event {
        /// Event name
        name: String,
        /// Payload
        data: Value,
    },
}

impl PublishPayload {
    /// Build an event payload
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        Self::Event {
            name: name.into(),
            data,
        }
    }
}

impl From<Message> for PublishPayload {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

/// A handle on one named channel
#[derive(Clone)]
pub struct Channel {
    name: String,
    path: String,
    options: ChannelOptions,
    presence: Presence,
    transport: Arc<dyn Transport>,
}

impl Channel {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        name: impl Into<String>,
        options: ChannelOptions,
    ) -> Self {
        let name = name.into();
        let path = format!("/channels/{}", urlencode(&name));
        // The presence companion is built eagerly so it is a plain accessor,
        // not lazily-dispatched state.
        let presence = Presence::new(Arc::clone(&transport), path.clone(), options.cipher.clone());

        Self {
            name,
            path,
            options,
            presence,
            transport,
        }
    }

    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel portion of the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Cipher for this channel, if it is encrypted
    pub fn cipher(&self) -> Option<&ChannelCipher> {
        self.options.cipher.as_ref()
    }

    /// Presence companion for this channel
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Publish a message to this channel.
    ///
    /// The channel cipher, when present, is attached before the payload is
    /// encoded, so encrypted channels never put plaintext on the wire.
    pub async fn publish(&self, payload: impl Into<PublishPayload>) -> Result<()> {
        let mut message = match payload.into() {
            PublishPayload::Message(message) => message,
            PublishPayload::Event { name, data } => Message::new(name, data),
        };

        if let Some(cipher) = &self.options.cipher {
            message.set_cipher_params(Arc::clone(cipher));
        }

        let record = message.to_record()?;
        self.transport
            .post(&format!("{}/messages", self.path), &StringMap::new(), record)
            .await?;
        Ok(())
    }

    /// Retrieve this channel's message history.
    ///
    /// Further pages are reachable through the returned result's `next` and
    /// `first` navigation.
    pub async fn history(&self, params: Vec<(String, String)>) -> Result<PaginatedResult<Message>> {
        let request = PageRequest::new(
            Arc::clone(&self.transport),
            format!("{}/messages", self.path),
            params,
            self.options.cipher.clone(),
        );
        PaginatedResult::fetch(request).await
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("encrypted", &self.options.cipher.is_some())
            .finish_non_exhaustive()
    }
}

/// Percent-encode a channel name for use in a request path
fn urlencode(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}
