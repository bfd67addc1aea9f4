//! Paginated resource orchestration
//!
//! One logical query (channel history, presence, device listings) becomes a
//! navigable sequence of immutable [`PaginatedResult`] pages. Each page is
//! the product of exactly one GET: the body records are materialized into
//! typed items one by one, the response headers become a
//! [`ContinuationMap`], and `first`/`next` construct new pages lazily from
//! it. No state lives outside the page values, so navigation is safe to
//! call concurrently from multiple holders of the same page.

use super::links::{build_continuations, rel, ContinuationMap};
use crate::error::Result;
use crate::http::Transport;
use crate::model::ChannelCipher;
use crate::types::StringMap;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// A typed result item that can be materialized from one raw server record.
///
/// Materialization order is fixed: construct, attach the cipher (when one
/// was supplied), then populate. Attaching before population lets
/// `populate` decrypt ciphertext fields inline as it parses them, so a
/// field is never observable in ciphertext form.
pub trait PageItem: Default + Send + Sync {
    /// Attach channel cipher parameters, enabling inline decryption during
    /// [`populate`](Self::populate). Models without encrypted fields may
    /// ignore the call.
    fn set_cipher(&mut self, cipher: ChannelCipher);

    /// Populate fields from one raw record. A record the model cannot
    /// represent is a [`Schema`](crate::Error::Schema) error, which aborts
    /// the whole page fetch.
    fn populate(&mut self, record: &Value) -> Result<()>;
}

/// Materialize one raw record into a typed item.
fn materialize<T: PageItem>(record: &Value, cipher: Option<&ChannelCipher>) -> Result<T> {
    let mut item = T::default();
    if let Some(cipher) = cipher {
        item.set_cipher(Arc::clone(cipher));
    }
    item.populate(record)?;
    Ok(item)
}

/// Immutable descriptor of one page query.
///
/// Continuation requests derive from the same descriptor: the item type and
/// cipher never change across pages of one logical query, only the path.
pub struct PageRequest<T> {
    transport: Arc<dyn Transport>,
    path: String,
    params: Vec<(String, String)>,
    cipher: Option<ChannelCipher>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PageRequest<T> {
    /// Create a page request for `path` with ordered query parameters.
    pub fn new(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        params: Vec<(String, String)>,
        cipher: Option<ChannelCipher>,
    ) -> Self {
        Self {
            transport,
            path: path.into(),
            params,
            cipher,
            _marker: PhantomData,
        }
    }

    /// The originating request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Derive the request for a continuation path. The resolved path
    /// already carries its query string, so no parameters are re-sent.
    fn continuation(&self, path: &str) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            path: path.to_string(),
            params: Vec::new(),
            cipher: self.cipher.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for PageRequest<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            path: self.path.clone(),
            params: self.params.clone(),
            cipher: self.cipher.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PageRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRequest")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

/// One materialized page of a list-style query.
///
/// Items keep server response order and are never mutated after
/// construction; navigation produces new pages.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    items: Vec<T>,
    continuations: ContinuationMap,
    request: PageRequest<T>,
}

impl<T: PageItem> PaginatedResult<T> {
    /// Fetch one page: a single GET, all-or-nothing materialization of the
    /// body records, and continuation links built from the headers.
    ///
    /// A body that is present but not an array yields zero items. A record
    /// that fails materialization aborts the fetch; partial pages are never
    /// returned.
    pub async fn fetch(request: PageRequest<T>) -> Result<Self> {
        let response = request
            .transport
            .get(&request.path, &StringMap::new(), &request.params)
            .await?;

        let mut items = Vec::new();
        if let Some(Value::Array(records)) = &response.body {
            for record in records {
                items.push(materialize::<T>(record, request.cipher.as_ref())?);
            }
        }

        let continuations = build_continuations(&request.path, &response.link_values())?;

        debug!(
            "Fetched page: {} ({} items, {} continuation links)",
            request.path,
            items.len(),
            continuations.len()
        );

        Ok(Self {
            items,
            continuations,
            request,
        })
    }

    /// The materialized items, in server response order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, yielding its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The continuation links advertised for this page
    pub fn continuations(&self) -> &ContinuationMap {
        &self.continuations
    }

    /// The request this page was derived from
    pub fn request(&self) -> &PageRequest<T> {
        &self.request
    }

    /// Navigate to the first page.
    ///
    /// Returns a copy of this page without any network call when it already
    /// is the first. Returns `Ok(None)` when the page is not first yet the
    /// server advertised no `first` relation; the current page stays valid,
    /// so inconsistent metadata is degraded rather than fatal.
    pub async fn first(&self) -> Result<Option<Self>>
    where
        T: Clone,
    {
        if self.is_first() {
            return Ok(Some(self.clone()));
        }
        match self.continuations.get(rel::FIRST) {
            Some(path) => Ok(Some(Self::fetch(self.request.continuation(path)).await?)),
            None => Ok(None),
        }
    }

    /// Navigate to the next page, or `Ok(None)` when this is the last.
    ///
    /// `None` exactly when [`has_next`](Self::has_next) is false.
    pub async fn next(&self) -> Result<Option<Self>> {
        if !self.is_paginated() {
            return Ok(None);
        }
        let Some(path) = self.continuations.get(rel::NEXT) else {
            return Ok(None);
        };
        Ok(Some(Self::fetch(self.request.continuation(path)).await?))
    }

    /// Whether a next page is available. Pure; no network.
    pub fn has_next(&self) -> bool {
        self.is_paginated() && self.continuations.contains(rel::NEXT)
    }

    /// Whether this is the first page. Always true for single-page results.
    ///
    /// For paginated results this compares the server-supplied `first` and
    /// `current` paths textually. Semantically-equal paths that differ in
    /// text (e.g. parameter order) would report non-first; the check
    /// mirrors what the service actually emits.
    pub fn is_first(&self) -> bool {
        if !self.is_paginated() {
            return true;
        }
        match (
            self.continuations.get(rel::FIRST),
            self.continuations.get(rel::CURRENT),
        ) {
            (Some(first), Some(current)) => first == current,
            _ => false,
        }
    }

    /// Whether this is the last page. Always true for single-page results.
    pub fn is_last(&self) -> bool {
        !self.is_paginated() || !self.continuations.contains(rel::NEXT)
    }

    /// Whether the result spans multiple server-side pages
    pub fn is_paginated(&self) -> bool {
        !self.continuations.is_empty()
    }
}
