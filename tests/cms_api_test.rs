use cms_feed::sources::cms_api::{parse_search_body, CmsApiSource};
use cms_feed::{FeedError, FetchConfig, Query};
use std::collections::HashMap;

#[test]
fn test_parse_search_body_full_envelope() {
    let body = r#"{
        "results": [
            {
                "uid": "first-post",
                "first_publication_date": "2021-03-15T10:30:00+00:00",
                "data": {
                    "title": [{"type": "heading1", "text": "First post", "spans": []}],
                    "author": [{"type": "paragraph", "text": "Jane Doe", "spans": []}]
                }
            }
        ],
        "next_page": "https://myrepo.cdn.prismic.io/api/v2/documents/search?page=2",
        "total_results_size": 3
    }"#;

    let page = parse_search_body(body).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].uid.as_deref(), Some("first-post"));
    assert!(page.next_cursor.as_deref().unwrap().contains("page=2"));
}

#[test]
fn test_parse_search_body_terminal_page() {
    let body = r#"{"results": [], "next_page": null}"#;
    let page = parse_search_body(body).unwrap();
    assert!(page.items.is_empty());
    assert!(page.next_cursor.is_none());
}

#[test]
fn test_parse_search_body_missing_results_is_malformed() {
    let body = r#"{"next_page": null}"#;
    match parse_search_body(body) {
        Err(FeedError::MalformedResponse(_)) => {}
        other => panic!("expected MalformedResponse, got {:?}", other),
    }

    assert!(matches!(
        parse_search_body("not json at all"),
        Err(FeedError::MalformedResponse(_))
    ));
}

#[test]
fn test_search_url_carries_query_and_page_size() {
    let source = CmsApiSource::new("https://myrepo.cdn.prismic.io/api/v2", FetchConfig::default())
        .unwrap()
        .with_access_token("secret");

    let query = Query::new("post").with_fields(vec![
        "post.title".to_string(),
        "post.subtitle".to_string(),
    ]);
    let url = source.search_url(&query, 20).unwrap();

    assert_eq!(url.path(), "/api/v2/documents/search");
    let params: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(params["q"], "[[at(document.type,\"post\")]]");
    assert_eq!(params["fetch"], "post.title,post.subtitle");
    assert_eq!(params["pageSize"], "20");
    assert_eq!(params["access_token"], "secret");
}

#[test]
fn test_invalid_api_url_is_rejected() {
    assert!(matches!(
        CmsApiSource::new("not a url", FetchConfig::default()),
        Err(FeedError::InvalidUrl(_))
    ));
}
