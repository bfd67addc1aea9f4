//! # Relay REST client
//!
//! A minimal, Rust-native client for the Relay hosted messaging service.
//! Applications construct a [`RestClient`], obtain [`Channel`] handles,
//! publish messages, and read history. List-style endpoints return a
//! [`PaginatedResult`](pagination::PaginatedResult) navigable through the
//! continuation links the service supplies in `Link` headers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_rest::{ClientOptions, PublishPayload, RestClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = RestClient::new(ClientOptions::with_key("app.keyid:secret"))?;
//!
//!     let channel = client.channel("greetings");
//!     channel.publish(PublishPayload::event("hello", "world".into())).await?;
//!
//!     let mut page = channel.history(vec![]).await?;
//!     loop {
//!         for message in page.items() {
//!             println!("{:?}: {:?}", message.name, message.data);
//!         }
//!         match page.next().await? {
//!             Some(next) => page = next,
//!             None => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        RestClient                          │
//! │   channel(name) → Channel      push() → DeviceRegistrations│
//! └────────────────────────────────────────────────────────────┘
//!                │                               │
//! ┌──────────────┴───────────┬───────────────────┴────────────┐
//! │         Channel          │        Pagination core         │
//! ├──────────────────────────┼────────────────────────────────┤
//! │ publish  history         │ Link parser   URL resolver     │
//! │ presence (get/history)   │ Materializer  first/next nav   │
//! └──────────────────────────┴────────────────────────────────┘
//!                              │
//!                   ┌──────────┴──────────┐
//!                   │  Transport (HTTP)   │
//!                   │  retry · backoff ·  │
//!                   │  rate limit · auth  │
//!                   └─────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Paginated resource retrieval
pub mod pagination;

/// Typed result models and the cipher seam
pub mod model;

/// Channel handle
pub mod channel;

/// Presence companion
pub mod presence;

/// Push device registration admin
pub mod push;

/// Client entry point
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{Channel, ChannelOptions, PublishPayload};
pub use client::{ClientOptions, RestClient};
pub use error::{Error, Result};
pub use model::{ChannelCipher, DeviceDetails, Message, PayloadCipher, PresenceMessage};
pub use pagination::{PageItem, PageRequest, PaginatedResult};
pub use presence::Presence;
pub use push::PushDeviceRegistrations;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
