use super::*;

fn test_client(base_url: &str) -> AnalyzerClient {
    AnalyzerClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

#[test]
fn endpoint_appends_to_base_path() {
    let client = test_client("https://api.example.com/backend/");
    let url = client.endpoint("api/history").expect("join");
    assert_eq!(url.as_str(), "https://api.example.com/backend/api/history");
}

#[test]
fn endpoint_handles_base_without_trailing_slash() {
    let client = test_client("https://api.example.com");
    let url = client.endpoint("health").expect("join");
    assert_eq!(url.as_str(), "https://api.example.com/health");
}

#[test]
fn history_url_encodes_the_id() {
    let client = test_client("https://api.example.com");
    let url = client.history_url("a b/c").expect("join");
    assert_eq!(url.as_str(), "https://api.example.com/api/history/a%20b%2Fc");

    let url = client.history_url("3f2b-11ee_x.y").expect("join");
    assert_eq!(url.as_str(), "https://api.example.com/api/history/3f2b-11ee_x.y");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = AnalyzerClient::with_base_url("not a url", 30).expect_err("should fail");
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
}

#[test]
fn detail_message_prefers_string_detail() {
    assert_eq!(
        detail_message(r#"{"detail":"Invalid URL"}"#).as_deref(),
        Some("Invalid URL")
    );
    assert_eq!(detail_message(r#"{"detail":""}"#), None);
    assert_eq!(detail_message(r#"{"detail":[{"msg":"field required"}]}"#), None);
    assert_eq!(detail_message("<html>Bad Gateway</html>"), None);
}
