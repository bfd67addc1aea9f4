//! Typed result models and the payload cipher seam
//!
//! Each model knows how to materialize itself from one raw server record
//! via [`PageItem`](crate::pagination::PageItem), decoding (and when a
//! cipher is attached, decrypting) its payload inline.

mod cipher;
mod codec;
mod device;
mod message;
mod presence;

pub use cipher::{ChannelCipher, PayloadCipher};
pub use codec::{decode_payload, encode_payload};
pub use device::DeviceDetails;
pub use message::Message;
pub use presence::{PresenceAction, PresenceMessage};
