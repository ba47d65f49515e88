//! Integration tests for `IdentityClient` using wiremock HTTP mocks.

use hpba_client::{IdentityClient, IdentityError, PkcePair};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> IdentityClient {
    IdentityClient::with_base_url(base_url, "anon-key", "google")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn exchange_code_returns_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "pkce"))
        .and(header("apikey", "anon-key"))
        .and(body_json(serde_json::json!({
            "auth_code": "code-123",
            "code_verifier": "verifier-abc"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-xyz",
            "refresh_token": "refresh-xyz",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": "user-1", "email": "staff@edge-i.jp" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = test_client(&server.uri())
        .exchange_code("code-123", "verifier-abc")
        .await
        .expect("should exchange");

    assert_eq!(session.access_token, "access-xyz");
    let identity = session.identity().expect("user embedded");
    assert_eq!(identity.id, "user-1");
    assert_eq!(identity.email.as_deref(), Some("staff@edge-i.jp"));
}

#[tokio::test]
async fn exchange_code_rejection_carries_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Auth code expired"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .exchange_code("stale", "verifier")
        .await
        .expect_err("should fail");

    match err {
        IdentityError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Auth code expired");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn get_user_resolves_identity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer access-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "user-1",
            "email": "staff@edge-i.jp",
            "aud": "authenticated"
        })))
        .mount(&server)
        .await;

    let identity = test_client(&server.uri())
        .get_user("access-xyz")
        .await
        .expect("lookup should succeed")
        .expect("signed in");

    assert_eq!(identity.id, "user-1");
    assert_eq!(identity.email.as_deref(), Some("staff@edge-i.jp"));
}

#[tokio::test]
async fn get_user_with_expired_token_is_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "msg": "invalid JWT" })),
        )
        .mount(&server)
        .await;

    let identity = test_client(&server.uri())
        .get_user("expired")
        .await
        .expect("401 is not an error");
    assert!(identity.is_none());
}

#[tokio::test]
async fn get_user_server_error_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .get_user("access-xyz")
        .await
        .expect_err("should fail");
    assert!(matches!(err, IdentityError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn sign_out_posts_logout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-xyz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .sign_out("access-xyz")
        .await
        .expect("should sign out");
}

#[tokio::test]
async fn sign_out_with_expired_token_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    test_client(&server.uri())
        .sign_out("expired")
        .await
        .expect("expired token needs no revocation");
}

#[test]
fn authorize_url_sends_hashed_challenge() {
    let pkce = PkcePair::generate();
    let url = test_client("https://idp.example.com")
        .authorize_url("http://localhost:3000/auth/callback", &pkce)
        .expect("url");

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("code_challenge_method".into(), "s256".into())));
    assert!(pairs.contains(&("code_challenge".into(), pkce.challenge.clone())));
    assert!(!url.as_str().contains(&pkce.verifier));
}
