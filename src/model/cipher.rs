//! Cipher seam for encrypted channel payloads
//!
//! The client applies a cipher, it never implements one. Channels configured
//! for encryption carry a [`ChannelCipher`] which the payload codec invokes
//! while encoding outgoing and decoding incoming message data.

use crate::error::Result;
use std::sync::Arc;

/// An external encryption capability supplied per channel.
///
/// Implementations own key material and algorithm choice; the client only
/// records the algorithm name in the payload encoding chain and hands
/// ciphertext back for decryption.
pub trait PayloadCipher: std::fmt::Debug + Send + Sync {
    /// Algorithm name recorded in the encoding chain, e.g. `aes-128-cbc`
    fn algorithm(&self) -> &str;

    /// Encrypt plaintext bytes
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt ciphertext bytes
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Shared handle to a channel's cipher, reusable across concurrent fetches
pub type ChannelCipher = Arc<dyn PayloadCipher>;
