use std::time::Duration;

use serde_json::json;

use crate::support::fast_config;
use crate::support::websocket::{pair_clients, start_fixture};
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn malformed_frames_close_the_socket() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let url = fx.server.ws_url();

    for frame in [
        "not json",
        r#"{"type": "teleport"}"#,
        r#"{"type": "reconnectGame", "sessionId": "nope", "slot": 1}"#,
    ] {
        let mut client = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
        client.send_text(frame).await?;
        let err = client.recv_json().await?.expect("error frame before close");
        assert_eq!(err["type"], "error");
        assert_eq!(err["code"], "BAD_REQUEST");
        assert!(client.recv_json().await?.is_none(), "socket stays open after {frame}");
    }

    fx.server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn rule_errors_keep_the_socket_open() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let (mut alice, mut bob, _, _) = pair_clients(&fx).await?;

    bob.send_json(&json!({"type": "makeMove", "column": 0})).await?;
    let err = bob.recv_until("error").await?;
    assert_eq!(err["code"], "NOT_YOUR_TURN");

    for column in [json!(9), json!(-1), json!("three"), json!(1.5)] {
        alice
            .send_json(&json!({"type": "makeMove", "column": column}))
            .await?;
        let err = alice.recv_until("error").await?;
        assert_eq!(err["code"], "INVALID_COLUMN", "column {column}");
        assert!(err["message"].is_string());
    }

    alice.send_json(&json!({"type": "makeMove", "column": 2})).await?;
    let made = bob.recv_until("moveMade").await?;
    assert_eq!(made["column"], 2);

    alice.close().await?;
    bob.close().await?;
    fx.server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn bad_usernames_and_moves_outside_a_game() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let mut client =
        WebSocketClient::connect_retry(&fx.server.ws_url(), Duration::from_secs(1)).await?;

    client
        .send_json(&json!({"type": "joinGame", "username": "   "}))
        .await?;
    let err = client.recv_until("error").await?;
    assert_eq!(err["code"], "INVALID_USERNAME");

    client.send_json(&json!({"type": "makeMove", "column": 3})).await?;
    let err = client.recv_until("error").await?;
    assert_eq!(err["code"], "NOT_IN_GAME");

    client.close().await?;
    fx.server.stop().await;
    Ok(())
}
