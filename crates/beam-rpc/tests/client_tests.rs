//! Integration tests for the backend client over a live Unix socket.
//!
//! A stub backend answers the fixed method surface, deliberately delaying
//! some responses to exercise out-of-order completion and pushing an
//! `index_status` notification mid-session.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::UnixListener;
use tokio_util::codec::Framed;

use beam_rpc::protocol::{Message, Notification, Request, Response, RpcError, methods};
use beam_rpc::transport::WireCodec;
use beam_rpc::types::{IndexState, ResponseTag};
use beam_rpc::LauncherClient;

fn stub_result(title: &str) -> serde_json::Value {
    json!({
        "id": format!("app:{title}"),
        "title": title,
        "subtitle": "Application",
        "category": "Applications",
        "path": format!("/usr/share/applications/{title}.desktop"),
    })
}

/// Serve a single connection, answering the contract methods.
///
/// A `search` for "slow" is answered only after the next request has been
/// answered, so clients see responses out of issue order.
async fn run_stub_backend(listener: UnixListener) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut framed = Framed::new(stream, WireCodec::new());

    framed
        .send(Message::Notification(Notification::new(
            methods::INDEX_STATUS,
            Some(json!({"state": "indexing", "message": "Indexing files", "count": 42})),
        )))
        .await
        .unwrap();

    let mut delayed: Option<Response> = None;

    while let Some(Ok(msg)) = framed.next().await {
        let Message::Request(Request {
            method, params, id, ..
        }) = msg
        else {
            continue;
        };
        let id = id.unwrap();

        let response = match method.as_str() {
            methods::IS_FIRST_RUN => Response::success(id, json!(false)),
            methods::HIDE_WINDOW | methods::COMPLETE_ONBOARDING => {
                Response::success(id, json!(null))
            }
            methods::SEARCH => {
                let query = params
                    .as_ref()
                    .and_then(|p| p.get("query"))
                    .and_then(|q| q.as_str())
                    .unwrap_or("")
                    .to_string();
                if query == "slow" {
                    delayed = Some(Response::success(id, json!([stub_result("slow")])));
                    continue;
                }
                let results = if query.is_empty() {
                    json!([stub_result("terminal"), stub_result("files")])
                } else {
                    json!([stub_result(&query)])
                };
                Response::success(id, results)
            }
            methods::EXECUTE => Response::success(id, json!("ok")),
            methods::CONTEXT_ACTIONS => Response::success(
                id,
                json!([{"id": "open", "label": "Open", "icon": ">"}]),
            ),
            methods::EXECUTE_CONTEXT_ACTION => Response::success(id, json!("copied")),
            _ => Response::error(id, RpcError::method_not_found()),
        };

        framed.send(Message::Response(response)).await.unwrap();
        if let Some(held) = delayed.take() {
            framed.send(Message::Response(held)).await.unwrap();
        }
    }
}

async fn start_stub() -> (LauncherClient, tokio::sync::mpsc::Receiver<Notification>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beam-test.sock");
    let listener = UnixListener::bind(&path).unwrap();
    tokio::spawn(run_stub_backend(listener));

    let (client, pushes) = LauncherClient::connect_to(path).await.unwrap();
    // Leak the tempdir so the socket path outlives this function.
    std::mem::forget(dir);
    (client, pushes)
}

#[tokio::test]
async fn test_search_request_response() {
    let (client, _pushes) = start_stub().await;

    let results = client.search("firefox").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "firefox");
    assert_eq!(results[0].category, "Applications");
}

#[tokio::test]
async fn test_empty_query_returns_default_set() {
    let (client, _pushes) = start_stub().await;

    let results = client.search("").await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_out_of_order_responses_route_by_id() {
    let (client, _pushes) = start_stub().await;

    // The stub holds the "slow" search response until the execute response
    // has been sent, so the second request completes first on the wire.
    let slow = client.search("slow");
    let exec = client.execute("app:terminal");
    let (slow_results, tag) = tokio::join!(slow, exec);

    assert_eq!(slow_results.unwrap()[0].title, "slow");
    assert_eq!(tag.unwrap(), ResponseTag::Ok);
}

#[tokio::test]
async fn test_typed_wrappers() {
    let (client, _pushes) = start_stub().await;

    assert!(!client.is_first_run().await.unwrap());
    client.complete_onboarding("Alt+Space").await.unwrap();
    client.hide_window().await.unwrap();

    let actions = client.context_actions("app:files").await.unwrap();
    assert_eq!(actions[0].id, "open");

    let tag = client
        .execute_context_action("app:files", "copy-path")
        .await
        .unwrap();
    assert_eq!(tag, ResponseTag::Copied);
}

#[tokio::test]
async fn test_void_results_deserialize_from_null() {
    let (client, _pushes) = start_stub().await;

    // The stub answers these with `"result":null`; they must come back Ok.
    client.hide_window().await.unwrap();
    client.complete_onboarding("Alt+Space").await.unwrap();
}

#[tokio::test]
async fn test_index_status_push_delivered() {
    let (_client, mut pushes) = start_stub().await;

    let notif = tokio::time::timeout(Duration::from_secs(2), pushes.recv())
        .await
        .expect("push within timeout")
        .expect("channel open");

    let status = notif.as_index_status().expect("index_status payload");
    assert_eq!(status.state, IndexState::Indexing);
    assert_eq!(status.count, 42);
}

#[tokio::test]
async fn test_unknown_method_surfaces_rpc_error() {
    let (client, _pushes) = start_stub().await;

    let err = client
        .request::<serde_json::Value>("no_such_method", None)
        .await
        .unwrap_err();
    assert!(matches!(err, beam_rpc::ClientError::Rpc { code, .. } if code == -32601));
}
