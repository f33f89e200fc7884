use super::client::validate_base_url;
use super::product::{select_matching, ProductListing};
use super::*;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(title: &str, images: &[&str]) -> Value {
    json!({
        "id": 1,
        "title": title,
        "handle": title.to_lowercase().replace(' ', "-"),
        "body_html": format!("<p>{title}</p>"),
        "product_type": "Electronics",
        "vendor": "Acme",
        "tags": ["sale", "new"],
        "images": images.iter().map(|src| json!({"src": src})).collect::<Vec<_>>(),
        "variants": [{"id": 10, "price": "499.00"}],
        "options": [{"name": "Size", "values": ["55in"]}]
    })
}

fn listing(products: Vec<Value>) -> Value {
    json!({ "products": products })
}

fn client() -> CatalogClient {
    CatalogClient::new(Duration::from_secs(5), None).unwrap()
}

fn query(keywords: &[&str], limit: u32) -> SearchQuery {
    SearchQuery::new(keywords.iter().map(|k| k.to_string()).collect(), limit)
}

async fn mount_listing(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn titles(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn test_search_matches_titles_case_insensitively() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        listing(vec![
            product("Smart TV 55in", &["https://cdn/tv.png"]),
            product("TV Stand", &[]),
            product("Radio", &["https://cdn/radio.png"]),
        ]),
    )
    .await;

    let products = client().search(&server.uri(), &query(&["tv"], 5)).await.unwrap();
    assert_eq!(titles(&products), ["Smart TV 55in", "TV Stand"]);
}

#[tokio::test]
async fn test_search_limit_keeps_first_matches() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        listing(vec![product("TV Stand", &[]), product("Smart TV 55in", &[])]),
    )
    .await;

    let products = client().search(&server.uri(), &query(&["tv"], 1)).await.unwrap();
    assert_eq!(titles(&products), ["TV Stand"]);
}

#[tokio::test]
async fn test_search_first_image_only() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        listing(vec![
            product("Lamp A", &["https://cdn/a1.png", "https://cdn/a2.png"]),
            product("Lamp B", &[]),
        ]),
    )
    .await;

    let products = client().search(&server.uri(), &query(&["lamp"], 5)).await.unwrap();
    assert_eq!(products[0].image.as_deref(), Some("https://cdn/a1.png"));
    assert_eq!(products[1].image, None);
    assert_eq!(products[0].category, "Electronics");
    assert_eq!(products[0].description, "<p>Lamp A</p>");
    assert_eq!(products[0].variants.len(), 1);
    assert_eq!(products[0].options.len(), 1);
}

#[tokio::test]
async fn test_search_invalid_base_url_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client().search("", &query(&["tv"], 5)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Configuration(_)));
    let err = client().search("http", &query(&["tv"], 5)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Configuration(_)));
}

#[tokio::test]
async fn test_search_server_error_is_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client().search(&server.uri(), &query(&["tv"], 5)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream { status: 500 }));
}

#[tokio::test]
async fn test_search_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client().search(&server.uri(), &query(&["tv"], 5)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn test_search_sends_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![product("TV", &[])])))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(Duration::from_secs(5), Some(250)).unwrap();
    let uri = format!("{}/", server.uri());
    let products = client.search(&uri, &query(&["tv"], 5)).await.unwrap();
    assert_eq!(products.len(), 1);
}

fn raw_listing(value: Value) -> ProductListing {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_select_includes_product_once_for_several_keywords() {
    let raw = raw_listing(listing(vec![
        product("Smart TV 4k", &[]),
        product("Radio", &[]),
        product("4k Monitor", &[]),
    ]));
    let keywords = vec!["tv".to_string(), "4K".to_string()];
    let products = select_matching(raw.products, &keywords, 20);
    assert_eq!(titles(&products), ["Smart TV 4k", "4k Monitor"]);
}

#[test]
fn test_select_returns_min_of_matches_and_limit() {
    let raw = raw_listing(listing(
        (0..10).map(|i| product(&format!("Chair {i}"), &[])).collect(),
    ));
    let products = select_matching(raw.products, &["chair".to_string()], 3);
    assert_eq!(titles(&products), ["Chair 0", "Chair 1", "Chair 2"]);
}

#[test]
fn test_select_ignores_description_and_tags() {
    let raw = raw_listing(json!({"products": [
        {"title": "Sofa", "body_html": "pairs well with a tv", "tags": ["tv"]}
    ]}));
    assert!(select_matching(raw.products, &["tv".to_string()], 5).is_empty());
}

#[test]
fn test_tags_accept_comma_separated_string() {
    let raw = raw_listing(json!({"products": [
        {"title": "Desk", "tags": "office, wood ,, sale"},
        {"title": "Desk lamp", "tags": null}
    ]}));
    let products = select_matching(raw.products, &["desk".to_string()], 5);
    let tags: Vec<_> = products[0].tags.iter().map(String::as_str).collect();
    assert_eq!(tags, ["office", "sale", "wood"]);
    assert!(products[1].tags.is_empty());
}

#[test]
fn test_product_serde_roundtrip_keeps_identity() {
    let raw = raw_listing(listing(vec![product("TV", &["https://cdn/tv.png"])]));
    let original = select_matching(raw.products, &["tv".to_string()], 1).remove(0);
    let text = serde_json::to_string(&original).unwrap();
    let parsed: Product = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.title, original.title);
    assert_eq!(parsed.tags, original.tags);
    assert_eq!(parsed.image, original.image);
}

#[test]
fn test_validate_base_url_trims_trailing_slash() {
    assert_eq!(
        validate_base_url("https://shop.example.com/").unwrap(),
        "https://shop.example.com"
    );
    assert!(validate_base_url("  ").is_err());
}

#[test]
fn test_query_clamps_limit() {
    assert_eq!(query(&["tv"], 50).limit, 20);
    assert_eq!(SearchQuery::default().limit, 5);
}

#[tokio::test]
async fn test_slow_catalog_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![product("Smart TV", &[])]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let client = CatalogClient::new(Duration::from_millis(100), None).unwrap();

    let err = client
        .search(&server.uri(), &query(&["tv"], 5))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Transport(ref e) if e.is_timeout()));
}
