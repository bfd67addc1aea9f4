//! Tests for the pagination core

use super::*;
use crate::error::{Error, Result};
use crate::http::{RawResponse, Transport};
use crate::model::ChannelCipher;
use crate::types::StringMap;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use test_case::test_case;

// ============================================================================
// Link Header Parser Tests
// ============================================================================

#[test]
fn test_parse_link_header_single_entry() {
    let pairs = parse_link_header("<./messages?start=100>; rel=\"next\"");
    assert_eq!(
        pairs,
        vec![("./messages?start=100".to_string(), "next".to_string())]
    );
}

#[test]
fn test_parse_link_header_extracts_all_entries() {
    let blob = "Link: </channels/foo/messages?start=0>; rel=\"first\", Link: <./messages?start=100>; rel=\"next\"";
    let pairs = parse_link_header(blob);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].0, "/channels/foo/messages?start=0");
    assert_eq!(pairs[0].1, "first");
    assert_eq!(pairs[1].0, "./messages?start=100");
    assert_eq!(pairs[1].1, "next");
}

#[test]
fn test_parse_link_header_multi_line() {
    let blob = "Link: <./a>; rel=\"first\"\nLink: <./b>; rel=\"next\"";
    let pairs = parse_link_header(blob);
    assert_eq!(pairs.len(), 2);
}

#[test_case("" ; "empty blob")]
#[test_case("Content-Type: application/json" ; "unrelated header")]
#[test_case("<./messages>; rel=next" ; "missing quotes")]
#[test_case("./messages; rel=\"next\"" ; "missing angle brackets")]
fn test_parse_link_header_no_match(blob: &str) {
    assert!(parse_link_header(blob).is_empty());
}

#[test]
fn test_parse_link_header_skips_malformed_entry_only() {
    // One malformed entry never fails the whole extraction
    let blob = "<./bad>; rel=unquoted, <./good>; rel=\"next\"";
    let pairs = parse_link_header(blob);
    assert_eq!(pairs, vec![("./good".to_string(), "next".to_string())]);
}

// ============================================================================
// Relative URL Resolver Tests
// ============================================================================

#[test]
fn test_resolve_continuation_directory_relative() {
    let resolved =
        resolve_continuation("/channels/foo/messages", "./messages?start=100").unwrap();
    assert_eq!(resolved, "/channels/foo/messages?start=100");
}

#[test]
fn test_resolve_continuation_against_path_with_query() {
    let resolved =
        resolve_continuation("/channels/foo/messages?start=100", "./messages?start=200").unwrap();
    assert_eq!(resolved, "/channels/foo/messages?start=200");
}

#[test_case("https://other/x" ; "absolute url")]
#[test_case("/x" ; "rooted path")]
#[test_case("messages?start=0" ; "bare path")]
fn test_resolve_continuation_rejects_unsupported_forms(link: &str) {
    let err = resolve_continuation("/channels/foo/messages", link).unwrap_err();
    assert!(matches!(err, Error::Protocol { .. }));
}

#[test]
fn test_build_continuations() {
    let values = vec![
        "<./messages?start=0>; rel=\"first\", <./messages?start=0>; rel=\"current\"".to_string(),
        "<./messages?start=100>; rel=\"next\"".to_string(),
    ];
    let map = build_continuations("/channels/foo/messages", &values).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(rel::FIRST), Some("/channels/foo/messages?start=0"));
    assert_eq!(map.get(rel::NEXT), Some("/channels/foo/messages?start=100"));
}

#[test]
fn test_build_continuations_rejects_absolute_link() {
    let values = vec!["</channels/foo/messages?start=0>; rel=\"first\"".to_string()];
    let err = build_continuations("/channels/foo/messages", &values).unwrap_err();
    assert!(matches!(err, Error::Protocol { .. }));
}

#[test]
fn test_build_continuations_empty_for_no_links() {
    let map = build_continuations("/channels/foo/messages", &[]).unwrap();
    assert!(map.is_empty());
}

// ============================================================================
// Mock transport and test item
// ============================================================================

/// Scripted transport: pops one response per GET and records every path.
#[derive(Debug, Default)]
struct MockTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    paths: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            paths: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        path: &str,
        _headers: &StringMap,
        _params: &[(String, String)],
    ) -> Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Other("mock transport exhausted".to_string()))
    }

    async fn post(&self, _path: &str, _headers: &StringMap, _body: Value) -> Result<RawResponse> {
        Err(Error::Other("mock transport does not support POST".to_string()))
    }

    async fn put(&self, _path: &str, _headers: &StringMap, _body: Value) -> Result<RawResponse> {
        Err(Error::Other("mock transport does not support PUT".to_string()))
    }
}

fn response(body: Value, links: &[&str]) -> RawResponse {
    let mut headers = HeaderMap::new();
    for link in links {
        headers.append(reqwest::header::LINK, HeaderValue::from_str(link).unwrap());
    }
    RawResponse {
        status: 200,
        body: Some(body),
        headers,
    }
}

/// Minimal item type used to observe materialization behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TestItem {
    id: u64,
    cipher_seen: bool,
    cipher_attached_before_populate: bool,
}

impl PageItem for TestItem {
    fn set_cipher(&mut self, _cipher: ChannelCipher) {
        self.cipher_seen = true;
    }

    fn populate(&mut self, record: &Value) -> Result<()> {
        // Snapshot taken during population proves attach-then-populate order
        self.cipher_attached_before_populate = self.cipher_seen;
        let id = record
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::schema("record is missing 'id'"))?;
        self.id = id;
        Ok(())
    }
}

fn request(transport: &Arc<MockTransport>, path: &str) -> PageRequest<TestItem> {
    PageRequest::new(
        Arc::clone(transport) as Arc<dyn Transport>,
        path,
        Vec::new(),
        None,
    )
}

// ============================================================================
// Paginated Resource Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_single_page() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}, {"id": 2}, {"id": 3}]),
        &[],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert_eq!(page.items().len(), 3);
    assert_eq!(page.items()[0].id, 1);
    assert!(!page.is_paginated());
    assert!(page.is_first());
    assert!(page.is_last());
    assert!(!page.has_next());
    assert!(page.next().await.unwrap().is_none());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_fetch_non_array_body_yields_zero_items() {
    let transport = MockTransport::new(vec![response(json!({"unexpected": true}), &[])]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert!(page.items().is_empty());
    assert!(page.is_first());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_fetch_missing_body_yields_zero_items() {
    let transport = MockTransport::new(vec![RawResponse {
        status: 200,
        body: None,
        headers: HeaderMap::new(),
    }]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert!(page.items().is_empty());
}

#[tokio::test]
async fn test_fetch_preserves_server_order() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 30}, {"id": 10}, {"id": 20}]),
        &[],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    let ids: Vec<u64> = page.items().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[tokio::test]
async fn test_fetch_schema_error_aborts_whole_page() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}, {"wrong": true}, {"id": 3}]),
        &[],
    )]);

    let err = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Schema { .. }));
}

#[tokio::test]
async fn test_fetch_protocol_error_on_unsupported_link() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}]),
        &["<https://other.example/x>; rel=\"next\""],
    )]);

    let err = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Protocol { .. }));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_fetch_propagates_transport_error() {
    let transport = MockTransport::new(vec![]);
    // Exhausted mock behaves like a failing transport
    let err = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Other(_)));
}

#[tokio::test]
async fn test_middle_page_predicates_and_next() {
    let transport = MockTransport::new(vec![
        response(
            json!([{"id": 1}]),
            &[
                "<./messages?start=0>; rel=\"first\"",
                "<./messages?start=100>; rel=\"current\"",
                "<./messages?start=200>; rel=\"next\"",
            ],
        ),
        response(json!([{"id": 2}]), &[]),
    ]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages?start=100"))
        .await
        .unwrap();

    assert!(page.is_paginated());
    assert!(!page.is_first());
    assert!(!page.is_last());
    assert!(page.has_next());

    let next = page.next().await.unwrap().expect("next page");
    assert_eq!(next.items().len(), 1);
    assert_eq!(next.items()[0].id, 2);
    assert_eq!(transport.calls(), 2);
    assert_eq!(
        transport.paths(),
        vec![
            "/channels/foo/messages?start=100".to_string(),
            "/channels/foo/messages?start=200".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_first_on_first_page_performs_no_fetch() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}]),
        &[
            "<./messages?start=0>; rel=\"first\"",
            "<./messages?start=0>; rel=\"current\"",
            "<./messages?start=100>; rel=\"next\"",
        ],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert!(page.is_first());
    let first = page.first().await.unwrap().expect("first page");
    assert_eq!(first.items(), page.items());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_first_on_unpaginated_page_performs_no_fetch() {
    let transport = MockTransport::new(vec![response(json!([{"id": 1}]), &[])]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    let first = page.first().await.unwrap().expect("first page");
    assert_eq!(first.items(), page.items());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_first_follows_first_relation() {
    let transport = MockTransport::new(vec![
        response(
            json!([{"id": 2}]),
            &[
                "<./messages?start=0>; rel=\"first\"",
                "<./messages?start=100>; rel=\"current\"",
            ],
        ),
        response(json!([{"id": 1}]), &[]),
    ]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages?start=100"))
        .await
        .unwrap();

    assert!(!page.is_first());
    let first = page.first().await.unwrap().expect("first page");
    assert_eq!(first.items()[0].id, 1);
    assert_eq!(
        transport.paths()[1],
        "/channels/foo/messages?start=0".to_string()
    );
}

#[tokio::test]
async fn test_first_missing_relation_is_degraded_not_fatal() {
    // Paginated page with no first relation: inconsistent metadata from the
    // server, observable as None rather than an error
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}]),
        &["<./messages?start=100>; rel=\"current\""],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert!(!page.is_first());
    assert!(page.first().await.unwrap().is_none());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_next_none_iff_has_next_false() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}]),
        &[
            "<./messages?start=0>; rel=\"first\"",
            "<./messages?start=0>; rel=\"current\"",
        ],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    assert!(!page.has_next());
    assert!(page.next().await.unwrap().is_none());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_predicates_are_idempotent_and_never_fetch() {
    let transport = MockTransport::new(vec![response(
        json!([{"id": 1}]),
        &[
            "<./messages?start=0>; rel=\"first\"",
            "<./messages?start=0>; rel=\"current\"",
            "<./messages?start=100>; rel=\"next\"",
        ],
    )]);

    let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
        .await
        .unwrap();

    for _ in 0..3 {
        assert!(page.is_paginated());
        assert!(page.is_first());
        assert!(!page.is_last());
        assert!(page.has_next());
    }
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_unpaginated_is_first_and_last_regardless_of_item_count() {
    for body in [json!([]), json!([{"id": 1}, {"id": 2}])] {
        let transport = MockTransport::new(vec![response(body, &[])]);
        let page = PaginatedResult::fetch(request(&transport, "/channels/foo/messages"))
            .await
            .unwrap();
        assert!(!page.is_paginated());
        assert!(page.is_first());
        assert!(page.is_last());
    }
}

#[tokio::test]
async fn test_cipher_attached_before_population() {
    #[derive(Debug)]
    struct NoopCipher;
    impl crate::model::PayloadCipher for NoopCipher {
        fn algorithm(&self) -> &str {
            "noop"
        }
        fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
            Ok(plaintext.to_vec())
        }
        fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
            Ok(ciphertext.to_vec())
        }
    }

    let transport = MockTransport::new(vec![response(json!([{"id": 1}]), &[])]);
    let request: PageRequest<TestItem> = PageRequest::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        "/channels/foo/messages",
        Vec::new(),
        Some(Arc::new(NoopCipher)),
    );

    let page = PaginatedResult::fetch(request).await.unwrap();
    assert!(page.items()[0].cipher_attached_before_populate);
}
