//! Integration tests for the Discord client and bot against a mock Discord API.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tourney_notify::{
    recipients, ChannelError, DiscordClient, MessagingProvider, NotificationKind, OutboundMessage,
    TournamentBot,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-bot-token";

fn client(server: &MockServer) -> DiscordClient {
    DiscordClient::new(TOKEN).with_api_url(server.uri())
}

async fn mount_dm_channel(server: &MockServer, user: &str) {
    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_partial_json(json!({ "recipient_id": user })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": format!("dm-{user}"),
            "type": 1
        })))
        .mount(server)
        .await;
}

async fn mount_messages(server: &MockServer, channel_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/channels/{channel_id}/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": format!("msg-{channel_id}"),
            "channel_id": channel_id
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_open_dm_sends_bot_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(header("authorization", "Bot test-bot-token"))
        .and(body_partial_json(json!({ "recipient_id": "42" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "dm-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let channel_id = client(&server)
        .open_direct_channel(&"42".into())
        .await
        .unwrap();

    assert_eq!(channel_id, "dm-42");
}

#[tokio::test]
async fn test_create_message_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channels/777/messages"))
        .and(body_partial_json(json!({ "content": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server)
        .create_message("777", &OutboundMessage::text("hello"))
        .await
        .unwrap();

    assert_eq!(id, "m-1");
}

#[tokio::test]
async fn test_api_error_keeps_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"message": "Cannot send messages to this user", "code": 50007}"#,
        ))
        .mount(&server)
        .await;

    let err = client(&server)
        .open_direct_channel(&"blocked".into())
        .await
        .unwrap_err();

    match err {
        ChannelError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("50007"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channels/777/messages"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1.5"))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_message("777", &OutboundMessage::text("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChannelError::RateLimited { retry_after_secs: 2 }));
}

#[tokio::test]
async fn test_bot_embeds_match_notification() {
    let server = MockServer::start().await;
    mount_dm_channel(&server, "p1").await;

    Mock::given(method("POST"))
        .and(path("/channels/dm-p1/messages"))
        .and(body_partial_json(json!({
            "embeds": [{
                "color": 0x002e_cc71,
                "footer": { "text": "Tournament Platform" },
                "fields": [
                    { "name": "Match", "value": "Red vs Blue", "inline": false },
                    { "name": "Map", "value": "TBD", "inline": true }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "m-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let bot = TournamentBot::with_provider(Arc::new(client(&server)));
    let summary = bot
        .send_match_notification(&recipients(["p1"]), "Red", "Blue", "later today", None)
        .await
        .unwrap();

    assert_eq!(summary.success, recipients(["p1"]));
    assert!(summary.failed.is_empty());
}

#[tokio::test]
async fn test_bot_continues_after_unreachable_player() {
    let server = MockServer::start().await;
    mount_dm_channel(&server, "p1").await;
    mount_dm_channel(&server, "p3").await;
    mount_messages(&server, "dm-p1").await;
    mount_messages(&server, "dm-p3").await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_partial_json(json!({ "recipient_id": "p2" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Unknown User",
            "code": 10013
        })))
        .mount(&server)
        .await;

    let bot = TournamentBot::with_provider(Arc::new(client(&server)));
    let summary = bot
        .send_admin_notification(
            &recipients(["p1", "p2", "p3"]),
            "Heads up",
            "Check-in closes soon",
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.success, recipients(["p1", "p3"]));
    assert_eq!(summary.failed, recipients(["p2"]));
}

#[tokio::test]
async fn test_bot_continues_after_transport_failure() {
    let server = MockServer::start().await;
    mount_dm_channel(&server, "p1").await;
    mount_dm_channel(&server, "p3").await;
    mount_messages(&server, "dm-p1").await;
    mount_messages(&server, "dm-p3").await;

    // Slower than the client timeout, so p2 fails before any response arrives
    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_partial_json(json!({ "recipient_id": "p2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "dm-p2" }))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let client = DiscordClient::with_http(http, TOKEN, server.uri());

    let err = client.open_direct_channel(&"p2".into()).await.unwrap_err();
    assert!(matches!(err, ChannelError::Http(_)));
    assert_eq!(err.status(), None);

    let bot = TournamentBot::with_provider(Arc::new(client));
    let report = bot
        .notify(
            &NotificationKind::TeamInvite {
                team_name: "Owls".to_string(),
                inviter_name: "sam".to_string(),
            },
            &recipients(["p1", "p2", "p3"]),
        )
        .await
        .unwrap();

    let summary = report.summary();
    assert_eq!(summary.success, recipients(["p1", "p3"]));
    assert_eq!(summary.failed, recipients(["p2"]));

    let results = report.results();
    assert!(results[1].error.as_deref().unwrap().contains("HTTP request failed"));
}
