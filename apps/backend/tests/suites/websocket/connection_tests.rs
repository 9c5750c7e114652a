use std::time::Duration;

use serde_json::json;

use crate::support::fast_config;
use crate::support::websocket::{start_fixture, wait_for_connections};
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn connections_are_tracked_by_the_hub() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let url = fx.server.ws_url();

    let mut a = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let mut b = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    wait_for_connections(&fx.hub, 2, Duration::from_secs(2)).await?;

    a.close().await?;
    wait_for_connections(&fx.hub, 1, Duration::from_secs(2)).await?;
    b.close().await?;
    wait_for_connections(&fx.hub, 0, Duration::from_secs(2)).await?;

    fx.server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn leaderboard_over_the_socket() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let mut client =
        WebSocketClient::connect_retry(&fx.server.ws_url(), Duration::from_secs(1)).await?;

    client.send_json(&json!({"type": "getLeaderboard"})).await?;
    let reply = client.recv_until("leaderboardData").await?;
    assert_eq!(reply["leaderboard"], json!([]));

    client
        .send_json(&json!({"type": "getLeaderboard", "limit": 500}))
        .await?;
    let reply = client.recv_until("error").await?;
    assert_eq!(reply["code"], "INVALID_LIMIT");

    client.close().await?;
    fx.server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn closing_while_waiting_leaves_the_queue() -> Result<(), Box<dyn std::error::Error>> {
    let fx = start_fixture(fast_config()).await?;
    let mut client =
        WebSocketClient::connect_retry(&fx.server.ws_url(), Duration::from_secs(1)).await?;

    client
        .send_json(&json!({"type": "joinGame", "username": "alice"}))
        .await?;
    assert!(
        crate::support::wait_until(Duration::from_secs(2), || {
            fx.game_flow.waiting_players() == 1
        })
        .await
    );

    client.close().await?;
    wait_for_connections(&fx.hub, 0, Duration::from_secs(2)).await?;
    assert_eq!(fx.game_flow.waiting_players(), 0);

    fx.server.stop().await;
    Ok(())
}
