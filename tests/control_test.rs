//! Control session tests
//!
//! A single mockito server plays both the Spotify web token endpoint and the
//! local desktop client. Discovery is pinned to the server's port.

use mockito::{Matcher, Mock, Server, ServerGuard};
use spotctl::api::auth::{csrf_token, oauth_token, CSRF_TOKEN_PATH};
use spotctl::api::control::{PAUSE_PATH, PLAY_PATH};
use spotctl::api::discovery::STATUS_PATH;
use spotctl::api::http::build_client;
use spotctl::{ControlConfig, ControlError, SpotifyControl};

const OAUTH: &str = "oauth-token-xyz";
const CSRF: &str = "csrf-token-123";

// =============================================================================
// Mock Response Fixtures
// =============================================================================

fn status_json(playing: bool) -> String {
    format!(
        r#"{{
            "version": 9,
            "client_version": "1.0.57.474.gca9c9538",
            "playing": {},
            "shuffle": false,
            "repeat": false,
            "play_enabled": true,
            "prev_enabled": true,
            "next_enabled": true,
            "track": {{
                "track_resource": {{ "name": "Never Gonna Give You Up", "uri": "spotify:track:4uLU6hMCjMI75M1A2tKUQC" }},
                "artist_resource": {{ "name": "Rick Astley", "uri": "spotify:artist:0gxyHStUsqpMadRV0Di1Qt" }},
                "album_resource": {{ "name": "Whenever You Need Somebody", "uri": "spotify:album:6N9PS4QXF1D0OWPk0Sxtb4" }},
                "length": 213,
                "track_type": "normal"
            }},
            "playing_position": 12.5,
            "volume": 1.0,
            "online": true,
            "running": true
        }}"#,
        playing
    )
}

const CSRF_ERROR: &str = r#"{"error": {"type": "4101", "message": "Invalid Csrf token"}}"#;

fn port_of(server: &ServerGuard) -> u16 {
    let host = server.host_with_port();
    host.rsplit(':').next().unwrap().parse().unwrap()
}

fn config_for(server: &ServerGuard) -> ControlConfig {
    let port = port_of(server);
    ControlConfig::default()
        .with_ports(port..=port)
        .with_token_url(format!("{}/token", server.url()))
}

fn signed_query(extra: Vec<Matcher>) -> Matcher {
    let mut all = vec![
        Matcher::UrlEncoded("csrf".into(), CSRF.into()),
        Matcher::UrlEncoded("oauth".into(), OAUTH.into()),
    ];
    all.extend(extra);
    Matcher::AllOf(all)
}

async fn probe_mock(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", STATUS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(status_json(true))
        .create_async()
        .await
}

async fn oauth_mock(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("GET", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn csrf_mock(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("GET", CSRF_TOKEN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Mock player with a successful handshake; mocks must be kept alive
async fn mock_spotify() -> (ServerGuard, Vec<Mock>) {
    let mut server = Server::new_async().await;
    let mocks = vec![
        probe_mock(&mut server).await,
        oauth_mock(&mut server, &format!(r#"{{"t": "{}"}}"#, OAUTH)).await,
        csrf_mock(&mut server, &format!(r#"{{"token": "{}"}}"#, CSRF)).await,
    ];
    (server, mocks)
}

// =============================================================================
// OAuth Token
// =============================================================================

#[tokio::test]
async fn test_oauth_token_extracted() {
    let mut server = Server::new_async().await;
    let mock = oauth_mock(&mut server, r#"{"t":"abc123"}"#).await;
    let client = build_client(&ControlConfig::default()).unwrap();

    let token = oauth_token(&client, &format!("{}/token", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn test_oauth_token_sends_browser_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/token")
        .match_header("origin", "https://open.spotify.com")
        .match_header("referer", "https://open.spotify.com")
        .match_header("user-agent", Matcher::Regex("^spotctl/".into()))
        .with_status(200)
        .with_body(r#"{"t":"abc123"}"#)
        .create_async()
        .await;
    let client = build_client(&ControlConfig::default()).unwrap();

    let token = oauth_token(&client, &format!("{}/token", server.url())).await;

    mock.assert_async().await;
    assert_eq!(token.unwrap(), "abc123");
}

#[tokio::test]
async fn test_custom_user_agent_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/token")
        .match_header("user-agent", "Mozilla/5.0 spotctl-test")
        .with_status(200)
        .with_body(r#"{"t":"abc123"}"#)
        .create_async()
        .await;
    let config = ControlConfig::default().with_user_agent("Mozilla/5.0 spotctl-test");
    let client = build_client(&config).unwrap();

    let token = oauth_token(&client, &format!("{}/token", server.url())).await;

    mock.assert_async().await;
    assert_eq!(token.unwrap(), "abc123");
}

#[tokio::test]
async fn test_oauth_token_unreachable_is_network_error() {
    let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = free.local_addr().unwrap().port();
    drop(free);
    let client = build_client(&ControlConfig::default()).unwrap();

    let err = oauth_token(&client, &format!("http://127.0.0.1:{}/token", port))
        .await
        .unwrap_err();

    assert!(err.is_network(), "expected a network error, got {:?}", err);
    assert!(err.api().is_none());
}

#[tokio::test]
async fn test_oauth_token_missing_is_protocol_error() {
    let client = build_client(&ControlConfig::default()).unwrap();

    for body in [r#"{}"#, r#"{"t": ""}"#, r#"{"t": 42}"#, r#"{"t": null}"#] {
        let mut server = Server::new_async().await;
        let _mock = oauth_mock(&mut server, body).await;

        let err = oauth_token(&client, &format!("{}/token", server.url()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ControlError::Protocol(_)),
            "body {} gave {:?}",
            body,
            err
        );
    }
}

#[tokio::test]
async fn test_oauth_token_bad_json_is_parse_error() {
    let client = build_client(&ControlConfig::default()).unwrap();

    for body in ["<html>nope</html>", r#"["abc123"]"#, r#""abc123""#] {
        let mut server = Server::new_async().await;
        let _mock = oauth_mock(&mut server, body).await;

        let err = oauth_token(&client, &format!("{}/token", server.url()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ControlError::Parse(_)),
            "body {} gave {:?}",
            body,
            err
        );
    }
}

// =============================================================================
// CSRF Token
// =============================================================================

#[tokio::test]
async fn test_csrf_token_extracted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", CSRF_TOKEN_PATH)
        .match_header("origin", "https://open.spotify.com")
        .with_status(200)
        .with_body(r#"{"token": "csrf-abc"}"#)
        .create_async()
        .await;
    let client = build_client(&ControlConfig::default()).unwrap();

    let token = csrf_token(&client, "127.0.0.1", port_of(&server)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(token, "csrf-abc");
}

#[tokio::test]
async fn test_csrf_token_error_envelope() {
    let mut server = Server::new_async().await;
    let _mock = csrf_mock(&mut server, r#"{"error": {"type": "4102", "message": "Invalid origin"}}"#).await;
    let client = build_client(&ControlConfig::default()).unwrap();

    let err = csrf_token(&client, "127.0.0.1", port_of(&server))
        .await
        .unwrap_err();

    let api = err.api().expect("expected an API error");
    assert_eq!(api.code, 4102);
    assert_eq!(api.message, "Invalid origin");
}

#[tokio::test]
async fn test_csrf_token_missing_is_protocol_error() {
    let mut server = Server::new_async().await;
    let _mock = csrf_mock(&mut server, r#"{"csrf": "wrong-key"}"#).await;
    let client = build_client(&ControlConfig::default()).unwrap();

    let err = csrf_token(&client, "127.0.0.1", port_of(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, ControlError::Protocol(_)));
}

// =============================================================================
// Connect Sequence
// =============================================================================

#[tokio::test]
async fn test_connect_success() {
    let (server, _mocks) = mock_spotify().await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();

    assert_eq!(spotify.host(), "127.0.0.1");
    assert_eq!(spotify.port(), port_of(&server));
}

#[tokio::test]
async fn test_connect_fails_fast_without_port() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("GET", "/token")
        .with_status(200)
        .with_body(r#"{"t": "abc123"}"#)
        .expect(0)
        .create_async()
        .await;

    let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = free.local_addr().unwrap().port();
    drop(free);

    let config = ControlConfig::default()
        .with_ports(port..=port)
        .with_token_url(format!("{}/token", server.url()));
    let err = SpotifyControl::connect(config).await.unwrap_err();

    assert!(matches!(err, ControlError::PortNotFound { .. }));
    token.assert_async().await;
}

#[tokio::test]
async fn test_connect_fails_fast_without_oauth() {
    let mut server = Server::new_async().await;
    let _probe = probe_mock(&mut server).await;
    let _oauth = oauth_mock(&mut server, r#"{"error": "forbidden"}"#).await;
    let csrf = server
        .mock("GET", CSRF_TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"token": "never"}"#)
        .expect(0)
        .create_async()
        .await;

    let err = SpotifyControl::connect(config_for(&server)).await.unwrap_err();

    assert!(matches!(err, ControlError::Protocol(_)));
    csrf.assert_async().await;
}

#[tokio::test]
async fn test_connect_fails_on_csrf_error() {
    let mut server = Server::new_async().await;
    let _probe = probe_mock(&mut server).await;
    let _oauth = oauth_mock(&mut server, r#"{"t": "abc123"}"#).await;
    let _csrf = csrf_mock(&mut server, CSRF_ERROR).await;

    let err = SpotifyControl::connect(config_for(&server)).await.unwrap_err();
    assert_eq!(err.api().map(|e| e.code), Some(4101));
}

// =============================================================================
// Pause / Unpause
// =============================================================================

#[tokio::test]
async fn test_pause_and_unpause() {
    let (mut server, _mocks) = mock_spotify().await;
    let pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(signed_query(vec![Matcher::UrlEncoded("pause".into(), "true".into())]))
        .with_status(200)
        .with_body(status_json(false))
        .create_async()
        .await;
    let unpause = server
        .mock("GET", PAUSE_PATH)
        .match_query(signed_query(vec![Matcher::UrlEncoded("pause".into(), "false".into())]))
        .with_status(200)
        .with_body(status_json(true))
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();

    let status = spotify.pause().await.unwrap();
    assert!(!status.playing);
    pause.assert_async().await;

    let status = spotify.unpause().await.unwrap();
    assert!(status.playing);
    assert_eq!(status.track.track_resource.name, "Never Gonna Give You Up");
    unpause.assert_async().await;
}

#[tokio::test]
async fn test_pause_error_envelope() {
    let (mut server, _mocks) = mock_spotify().await;
    let _pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(CSRF_ERROR)
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let result = spotify.pause().await;

    let err = result.unwrap_err();
    let api = err.api().expect("expected an API error");
    assert_eq!(api.code, 4101);
    assert_eq!(api.message, "Invalid Csrf token");
}

#[tokio::test]
async fn test_envelope_wins_over_valid_status() {
    let (mut server, _mocks) = mock_spotify().await;
    let body = status_json(true).replacen(
        '{',
        r#"{"error": {"type": "4001", "message": "Unknown method"},"#,
        1,
    );
    let _pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let err = spotify.set_pause_state(true).await.unwrap_err();

    assert_eq!(err.api().map(|e| e.code), Some(4001));
}

#[tokio::test]
async fn test_server_error_without_envelope_is_protocol_error() {
    let (mut server, _mocks) = mock_spotify().await;
    let _pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("{}")
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let err = spotify.pause().await.unwrap_err();

    assert!(
        matches!(err, ControlError::Protocol(ref m) if m.contains("500")),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_server_error_with_envelope_is_api_error() {
    let (mut server, _mocks) = mock_spotify().await;
    let _pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(CSRF_ERROR)
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let err = spotify.pause().await.unwrap_err();

    assert_eq!(err.api().map(|e| e.code), Some(4101));
}

// =============================================================================
// Status
// =============================================================================

#[tokio::test]
async fn test_status() {
    let (server, _mocks) = mock_spotify().await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let status = spotify.status().await.unwrap();

    assert_eq!(status.version, 9);
    assert!(status.playing);
    assert_eq!(status.track.length, 213);
    assert_eq!(status.track.artist_resource.name, "Rick Astley");
}

#[tokio::test]
async fn test_undecodable_status_is_parse_error() {
    let (mut server, _mocks) = mock_spotify().await;
    let _pause = server
        .mock("GET", PAUSE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"playing": "yes"}"#)
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let err = spotify.pause().await.unwrap_err();
    assert!(matches!(err, ControlError::Parse(_)));
}

// =============================================================================
// Play
// =============================================================================

#[tokio::test]
async fn test_play_web_url_is_normalized() {
    let (mut server, _mocks) = mock_spotify().await;
    let play = server
        .mock("GET", PLAY_PATH)
        .match_query(signed_query(vec![Matcher::UrlEncoded(
            "uri".into(),
            "spotify:track:4uLU6hMCjMI75M1A2tKUQC".into(),
        )]))
        .with_status(200)
        .with_body(status_json(true))
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let status = spotify
        .play("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC")
        .await
        .unwrap();

    play.assert_async().await;
    assert!(status.playing);
}

#[tokio::test]
async fn test_play_in_context() {
    let (mut server, _mocks) = mock_spotify().await;
    let play = server
        .mock("GET", PLAY_PATH)
        .match_query(signed_query(vec![
            Matcher::UrlEncoded("uri".into(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC".into()),
            Matcher::UrlEncoded("context".into(), "spotify:album:6N9PS4QXF1D0OWPk0Sxtb4".into()),
        ]))
        .with_status(200)
        .with_body(status_json(true))
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    spotify
        .play_in_context(
            "spotify:track:4uLU6hMCjMI75M1A2tKUQC",
            "spotify:album:6N9PS4QXF1D0OWPk0Sxtb4",
        )
        .await
        .unwrap();

    play.assert_async().await;
}

#[tokio::test]
async fn test_play_unsupported_link_sends_nothing() {
    let (mut server, _mocks) = mock_spotify().await;
    let play = server
        .mock("GET", PLAY_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let spotify = SpotifyControl::connect(config_for(&server)).await.unwrap();
    let err = spotify
        .play("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M")
        .await
        .unwrap_err();

    assert!(matches!(err, ControlError::UnsupportedUri(_)));
    play.assert_async().await;
}

// =============================================================================
// Shared Session
// =============================================================================

#[tokio::test]
async fn test_session_shared_across_tasks() {
    let (server, _mocks) = mock_spotify().await;
    let spotify = std::sync::Arc::new(SpotifyControl::connect(config_for(&server)).await.unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let spotify = spotify.clone();
            tokio::spawn(async move { spotify.status().await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().playing);
    }
}
