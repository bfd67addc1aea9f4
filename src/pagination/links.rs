//! Link header parsing and continuation URL resolution
//!
//! The service advertises page navigation through `Link` headers of the
//! shape `Link: <./messages?start=100>; rel="next"`. Parsing is
//! best-effort: malformed entries are skipped, and a blob with no matching
//! entry simply means the result is single-page. Resolution is the strict
//! part: only `./`-relative links are supported, resolved against the
//! directory of the originating request path.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Relation names used for page navigation
pub mod rel {
    /// First page of the result set
    pub const FIRST: &str = "first";
    /// Next page of the result set
    pub const NEXT: &str = "next";
    /// The page that produced the current response
    pub const CURRENT: &str = "current";
}

/// Mapping from relation name to a resolved request path.
///
/// Empty when the server returned no link headers, which marks the result
/// as single-page and complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuationMap {
    links: HashMap<String, String>,
}

impl ContinuationMap {
    /// Create an empty map (unpaginated result)
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved path for a relation, if the server advertised one
    pub fn get(&self, relation: &str) -> Option<&str> {
        self.links.get(relation).map(String::as_str)
    }

    /// Whether a relation was advertised
    pub fn contains(&self, relation: &str) -> bool {
        self.links.contains_key(relation)
    }

    /// True when the server advertised no continuation links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of advertised relations
    pub fn len(&self) -> usize {
        self.links.len()
    }

    fn insert(&mut self, relation: String, path: String) {
        self.links.insert(relation, path);
    }
}

/// Extract every `(url, relation)` pair from a raw Link header blob.
///
/// Accepts both the comma-joined single-header form and multi-line blobs
/// where each entry carries its own `Link:` prefix. Entries missing the
/// angle brackets or the quoted `rel` attribute are skipped, not errors.
pub fn parse_link_header(blob: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in blob.lines() {
        for part in line.split(',') {
            let part = part.trim();
            // Tolerate a literal `Link:` prefix; the token is case-sensitive.
            let part = part.strip_prefix("Link:").unwrap_or(part).trim_start();

            let mut url = None;
            let mut relation = None;

            for segment in part.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') && segment.len() >= 2 {
                    url = Some(&segment[1..segment.len() - 1]);
                } else if let Some(stripped) = segment.strip_prefix("rel=") {
                    if stripped.starts_with('"') && stripped.ends_with('"') && stripped.len() >= 2 {
                        relation = Some(&stripped[1..stripped.len() - 1]);
                    }
                }
            }

            if let (Some(u), Some(r)) = (url, relation) {
                pairs.push((u.to_string(), r.to_string()));
            }
        }
    }

    pairs
}

/// Resolve a server-supplied continuation link against the originating
/// request path.
///
/// Only `./`-prefixed links are supported: the last segment of the
/// originating path is stripped and the remainder of the link appended.
/// Any other form (absolute URL, bare path) is a protocol violation, since
/// the client deliberately does not implement general URL resolution.
pub fn resolve_continuation(origin_path: &str, link: &str) -> Result<String> {
    let Some(remainder) = link.strip_prefix("./") else {
        return Err(Error::protocol(format!(
            "only relative URLs are supported in pagination, got '{link}'"
        )));
    };

    let directory = match origin_path.rfind('/') {
        Some(idx) => &origin_path[..=idx],
        None => origin_path,
    };

    Ok(format!("{directory}{remainder}"))
}

/// Build the continuation map for a page from its raw `Link` header values.
///
/// Parsing is best-effort but resolution is not: a recognized entry with an
/// unsupported URL form fails the whole operation.
pub fn build_continuations(origin_path: &str, link_values: &[String]) -> Result<ContinuationMap> {
    let mut map = ContinuationMap::new();

    for value in link_values {
        for (url, relation) in parse_link_header(value) {
            let resolved = resolve_continuation(origin_path, &url)?;
            map.insert(relation, resolved);
        }
    }

    Ok(map)
}
