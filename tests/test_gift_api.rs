//! End-to-end tests for the gift endpoints: an in-process server backed by the
//! in-memory document store, driven over HTTP with reqwest.

use gift_search::{transport, DatabaseService};
use serde_json::{json, Value};

async fn spawn_app(db_service: Option<DatabaseService>) -> Result<String, Box<dyn std::error::Error>> {
    let router = transport::http::create_router(transport::http::AppState::new(db_service));
    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

async fn create(client: &reqwest::Client, base_url: &str, body: Value) -> Result<String, Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}/api/gifts", base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(resp.status(), 200, "create failed for {}", body);
    let created: Value = resp.json().await?;
    Ok(created["id"].as_str().unwrap().to_string())
}

async fn search(client: &reqwest::Client, base_url: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let resp = client
        .get(format!("{}/api/gifts", base_url))
        .query(query)
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    Ok(resp.json().await?)
}

#[tokio::test]
async fn test_root_message() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(None).await?;
    let resp = reqwest::get(format!("{}/", base_url)).await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body, json!({ "message": "Gift Search Backend Running" }));
    Ok(())
}

#[tokio::test]
async fn test_create_then_find_by_gift() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(Some(DatabaseService::in_memory())).await?;
    let client = reqwest::Client::new();

    let id = create(
        &client,
        &base_url,
        json!({ "gift": "mug", "background": "blue", "pattern": "stripes" }),
    )
    .await?;
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let found = search(&client, &base_url, &[("gift", "mug")]).await?;
    assert_eq!(found.len(), 1);
    let record = &found[0];
    assert_eq!(record["id"], id.as_str());
    assert!(record.get("_id").is_none());
    assert_eq!(record["background"], "blue");
    assert_eq!(record["pattern"], "stripes");
    assert_eq!(record["price"], Value::Null);

    assert!(search(&client, &base_url, &[("gift", "Mug")]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_exact_filters_are_anded() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(Some(DatabaseService::in_memory())).await?;
    let client = reqwest::Client::new();

    for (gift, background, pattern, number) in [
        ("mug", "blue", "stripes", "1"),
        ("mug", "red", "stripes", "2"),
        ("mug", "red", "dots", "2"),
        ("toy", "red", "dots", "2"),
    ] {
        create(
            &client,
            &base_url,
            json!({ "gift": gift, "background": background, "pattern": pattern, "number": number }),
        )
        .await?;
    }

    let found = search(&client, &base_url, &[("gift", "mug"), ("background", "red")]).await?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|g| g["gift"] == "mug" && g["background"] == "red"));

    let found = search(
        &client,
        &base_url,
        &[("background", "red"), ("pattern", "dots"), ("number", "2")],
    )
    .await?;
    assert_eq!(found.len(), 2);

    // Empty and unknown parameters are ignored.
    let found = search(&client, &base_url, &[("gift", ""), ("colour", "green")]).await?;
    assert_eq!(found.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_free_text_search() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(Some(DatabaseService::in_memory())).await?;
    let client = reqwest::Client::new();

    let flowers = create(
        &client,
        &base_url,
        json!({
            "gift": "flowers",
            "background": "red",
            "pattern": "dots",
            "price": 19.99,
            "tags": ["birthday", "floral"]
        }),
    )
    .await?;
    let lamp = create(
        &client,
        &base_url,
        json!({ "gift": "lamp", "background": "white", "pattern": "plain", "title": "Desk Lamp" }),
    )
    .await?;
    let card = create(
        &client,
        &base_url,
        json!({ "gift": "card", "background": "white", "pattern": "plain", "description": "Happy BIRTHDAY card" }),
    )
    .await?;

    let found = search(&client, &base_url, &[("q", "birthday")]).await?;
    let ids: Vec<&str> = found.iter().map(|g| g["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![flowers.as_str(), card.as_str()]);
    assert_eq!(found[0]["price"], 19.99);
    assert_eq!(found[0]["tags"], json!(["birthday", "floral"]));

    let found = search(&client, &base_url, &[("q", "lamp")]).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], lamp.as_str());

    // Substring of a tag element, combined with an exact filter.
    let found = search(&client, &base_url, &[("q", "FLOR"), ("background", "red")]).await?;
    assert_eq!(found.len(), 1);
    let found = search(&client, &base_url, &[("q", "flor"), ("background", "white")]).await?;
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_limit_bounds() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(Some(DatabaseService::in_memory())).await?;
    let client = reqwest::Client::new();

    for i in 0..5 {
        create(
            &client,
            &base_url,
            json!({ "gift": "mug", "background": "blue", "pattern": format!("p{}", i) }),
        )
        .await?;
    }

    let found = search(&client, &base_url, &[("limit", "2")]).await?;
    assert_eq!(found.len(), 2);
    let found = search(&client, &base_url, &[("limit", "100")]).await?;
    assert_eq!(found.len(), 5);

    for bad in ["0", "101", "-3", "ten"] {
        let resp = client
            .get(format!("{}/api/gifts", base_url))
            .query(&[("limit", bad)])
            .send()
            .await?;
        assert_eq!(resp.status(), 422, "limit={} should be rejected", bad);
        let body: Value = resp.json().await?;
        assert_eq!(body["success"], false);
    }

    let resp = client
        .get(format!("{}/api/gifts?limit=0", base_url))
        .send()
        .await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["field"], "limit");
    Ok(())
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected_before_writing() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(Some(DatabaseService::in_memory())).await?;
    let client = reqwest::Client::new();

    let invalid = [
        json!({ "background": "blue", "pattern": "stripes" }),
        json!({ "gift": "mug", "pattern": "stripes" }),
        json!({ "gift": "mug", "background": "blue" }),
        json!({ "gift": 5, "background": "blue", "pattern": "stripes" }),
        json!({ "gift": "mug", "background": "blue", "pattern": "stripes", "tags": "birthday" }),
        json!({ "gift": "mug", "background": "blue", "pattern": "stripes", "price": -1 }),
    ];
    for body in invalid {
        let resp = client
            .post(format!("{}/api/gifts", base_url))
            .json(&body)
            .send()
            .await?;
        assert_eq!(resp.status(), 422, "body {} should be rejected", body);
    }

    let resp = client
        .post(format!("{}/api/gifts", base_url))
        .json(&json!({ "gift": "mug", "background": "blue", "pattern": "stripes", "price": -1 }))
        .send()
        .await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["field"], "price");

    assert!(search(&client, &base_url, &[]).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_database_is_a_server_error() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(None).await?;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/api/gifts", base_url)).send().await?;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "Database not configured");

    let resp = client
        .post(format!("{}/api/gifts", base_url))
        .json(&json!({ "gift": "mug", "background": "blue", "pattern": "stripes" }))
        .send()
        .await?;
    assert_eq!(resp.status(), 500);
    Ok(())
}

#[tokio::test]
async fn test_cors_is_open() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_app(None).await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/", base_url))
        .header("Origin", "https://gifts.example")
        .send()
        .await?;
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}
