//! Paginated resource retrieval
//!
//! Turns a single logical query into a navigable sequence of result pages
//! using the opaque continuation links the service supplies in `Link`
//! headers.
//!
//! # Overview
//!
//! A [`PageRequest`] describes the query: path, ordered parameters, item
//! type, and an optional channel cipher. [`PaginatedResult::fetch`]
//! performs one round trip and materializes the page; `first` and `next`
//! follow continuation links lazily, reusing the same item type and cipher.

mod links;
mod resource;

pub use links::{
    build_continuations, parse_link_header, rel, resolve_continuation, ContinuationMap,
};
pub use resource::{PageItem, PageRequest, PaginatedResult};

#[cfg(test)]
mod tests;
