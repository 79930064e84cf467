use std::sync::Arc;

use anyhow::Result;
use assert_json_diff::{assert_json_eq, assert_json_include};
use reqwest::StatusCode;
use serde_json::{json, Value};

use resource_api::api::ListResponse;
use resource_api::store::MemoryResourceStore;

use crate::common::*;
mod common;

async fn seeded_server() -> ServerHandle {
    ServerHandle::for_store(Arc::new(MemoryResourceStore::seeded())).await
}

#[tokio::test]
async fn it_lists_resources_by_category() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/resources?category=domestic-violence").await;
    assert_eq!(StatusCode::OK, res.status());

    let json_data = res.json::<Value>().await?;
    assert_json_include!(
        actual: json_data,
        expected: json!({
            "success": true,
            "count": 2,
            "data": [
                {"id": 3, "name": "Local Women's Shelter - NYC", "location": "New York"},
                {"id": 1, "name": "National Domestic Violence Hotline", "location": "National"},
            ],
            "filters": {"location": null, "category": "domestic-violence"},
        })
    );

    Ok(())
}

#[tokio::test]
async fn it_lists_everything_without_filters() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/resources").await;
    assert_eq!(StatusCode::OK, res.status());

    let list = res.json::<ListResponse>().await?;
    assert!(list.success);
    assert_eq!(list.count, list.data.len());
    assert_eq!(
        list.data.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 2, 1]
    );
    assert!(list
        .data
        .windows(2)
        .all(|pair| pair[0].created_at > pair[1].created_at));

    Ok(())
}

#[tokio::test]
async fn it_intersects_location_and_category() -> Result<()> {
    let server = seeded_server().await;

    let res = server
        .get("/resources?location=NATIONAL&category=health")
        .await;
    assert_eq!(StatusCode::OK, res.status());

    let list = res.json::<ListResponse>().await?;
    assert_eq!(list.count, 1);
    assert_eq!(list.data[0].name, "Crisis Text Line");

    Ok(())
}

#[tokio::test]
async fn it_fetches_a_resource_by_id() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/resources/2").await;
    assert_eq!(StatusCode::OK, res.status());

    let json_data = res.json::<Value>().await?;
    assert_json_include!(
        actual: json_data,
        expected: json!({
            "success": true,
            "data": {
                "id": 2,
                "name": "Crisis Text Line",
                "category": "mental-health",
                "location": "National",
                "phone": "Text HOME to 741741",
                "website": "https://www.crisistextline.org",
                "available24h": true,
                "description": "24/7 crisis support via text",
            }
        })
    );

    Ok(())
}

#[tokio::test]
async fn it_returns_404_for_unknown_resource() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/resources/999").await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());

    assert_json_eq!(
        res.json::<Value>().await?,
        json!({"success": false, "error": "Resource not found"})
    );

    Ok(())
}

#[tokio::test]
async fn it_returns_500_when_the_store_fails() -> Result<()> {
    let store = Arc::new(MemoryResourceStore::seeded());
    let server = ServerHandle::for_store(store.clone()).await;
    store.set_failing(true);

    let res = server.get("/resources").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());

    let json_data = res.json::<Value>().await?;
    assert_json_include!(
        actual: json_data.clone(),
        expected: json!({"success": false, "error": "Failed to fetch resources"})
    );
    assert!(json_data["message"].is_string());

    Ok(())
}

#[tokio::test]
async fn it_reports_health() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/health").await;
    assert_eq!(StatusCode::OK, res.status());

    let json_data = res.json::<Value>().await?;
    assert_eq!(json_data["status"], json!("OK"));
    let timestamp = json_data["timestamp"].as_str().expect("timestamp is a string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    Ok(())
}

#[tokio::test]
async fn it_returns_plain_text_404_for_unknown_routes() -> Result<()> {
    let server = seeded_server().await;

    let res = server.get("/nonexistent").await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert!(res.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()?
        .starts_with("text/plain"));

    let body = res.text().await?;
    assert!(body.contains("/nonexistent"));

    Ok(())
}
