use chrono::NaiveDate;
use sdash_core::Platform;

use super::*;

fn test_client(base_url: &str) -> AnalyticsClient {
    AnalyticsClient::with_base_url(base_url, Some(30), "sdash-test", 0, 0)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_path_to_base_path() {
    let client = test_client("http://localhost:8000/api");
    let url = client.build_url("stats/overview", &[]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/stats/overview");
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("http://localhost:8000/api/");
    let url = client
        .build_url("posts", &[("limit", "10".to_string())])
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/posts?limit=10");
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("http://localhost:8000");
    let url = client
        .build_url("posts", &[("profile_id", "a b&c".to_string())])
        .unwrap();
    assert!(
        url.as_str().contains("a+b%26c") || url.as_str().contains("a%20b%26c"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = AnalyticsClient::with_base_url("not a url", None, "ua", 0, 0);
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl { .. })));
}

#[test]
fn filter_pairs_includes_only_present_filters() {
    let query = ScopeQuery {
        platform: Some(Platform::Instagram),
        profile_id: Some("p1".to_string()),
        date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
        date_to: None,
        limit: 50,
    };
    let pairs = AnalyticsClient::filter_pairs(&query, true, true);
    assert_eq!(
        pairs,
        vec![
            ("platform", "instagram".to_string()),
            ("profile_id", "p1".to_string()),
            ("date_from", "2025-01-01".to_string()),
            ("limit", "50".to_string()),
        ]
    );
}

#[test]
fn sentiment_pairs_omit_dates_and_limit() {
    let query = ScopeQuery {
        platform: None,
        profile_id: Some("p1".to_string()),
        date_from: NaiveDate::from_ymd_opt(2025, 1, 1),
        date_to: NaiveDate::from_ymd_opt(2025, 1, 31),
        limit: 50,
    };
    let pairs = AnalyticsClient::filter_pairs(&query, false, false);
    assert_eq!(pairs, vec![("profile_id", "p1".to_string())]);
}
