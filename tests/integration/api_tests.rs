//! API integration tests
//!
//! These run against a live server seeded with the bootstrap administrator.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:4000/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Suffix keeping unique columns distinct between runs
fn unique() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn create(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201, "POST {}", path);
    response.json().await.expect("Failed to parse response")
}

async fn delete(client: &Client, token: &str, path: &str) -> u16 {
    client
        .delete(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .status()
        .as_u16()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("custodia_session="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["account"]["role"], "admin");
    assert!(body["account"]["password_hash"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/maintenance", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_forgot_password_is_generic() {
    let client = Client::new();

    let known: Value = client
        .post(format!("{}/auth/forgot-password", BASE_URL))
        .json(&json!({ "username": "admin" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let unknown: Value = client
        .post(format!("{}/auth/forgot-password", BASE_URL))
        .json(&json!({ "username": format!("ghost-{}", unique()) }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(known["message"], unknown["message"]);
}

#[tokio::test]
#[ignore]
async fn test_validation_errors_are_aggregated() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/maintenance", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "kind": "cosmetic",
            "priority": "urgent",
            "scheduled_at": "not a date"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].as_array().expect("errors array");
    // equipment, person, kind, priority and the scheduled date
    assert!(errors.len() >= 5, "{:?}", errors);
}

#[tokio::test]
#[ignore]
async fn test_maintenance_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tag = unique();

    let location = create(
        &client,
        &token,
        "/locations",
        json!({ "code": format!("LOC-{}", tag), "site": "Norte", "building": "A", "floor": "2", "room": "201" }),
    )
    .await;
    let custodian = create(
        &client,
        &token,
        "/custodians",
        json!({ "area_code": format!("AR-{}", tag), "area_name": "Sistemas" }),
    )
    .await;
    let position = create(
        &client,
        &token,
        "/positions",
        json!({ "name": format!("Técnico {}", tag), "kind": "external" }),
    )
    .await;
    let person = create(
        &client,
        &token,
        "/maintenance-people",
        json!({
            "national_id": format!("9{}", &tag[..6]),
            "given_names": "Ana María",
            "family_names": "Pérez",
            "position_id": position["id"]
        }),
    )
    .await;
    let code = format!("INV-{}", tag);
    let equipment = create(
        &client,
        &token,
        "/equipment",
        json!({
            "codigo_inventario": code,
            "serial": format!("SN-{}", tag),
            "marca": "Dell",
            "modelo": "Latitude",
            "tipo": "laptop",
            "estado": "operational",
            "ubicacionId": location["id"],
            "responsableId": custodian["id"].to_string()
        }),
    )
    .await;

    // Equipment given by inventory code, person by id
    let record = create(
        &client,
        &token,
        "/maintenance",
        json!({
            "inventory_code": code,
            "person_id": person["id"],
            "kind": "preventive",
            "scheduled_at": "2025-03-01T15:00:00Z",
            "next_due": "2025-09-01"
        }),
    )
    .await;
    assert_eq!(record["equipment_id"], equipment["id"]);
    assert_eq!(record["priority"], "medium");
    assert_eq!(record["scheduled_at"], "2025-03-01T10:00:00-05:00");
    assert_eq!(record["next_due"], "2025-09-01");

    // Partial update keeps omitted fields
    let updated: Value = client
        .put(format!("{}/maintenance/{}", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .json(&json!({ "result": "successful" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(updated["result"], "successful");
    assert_eq!(updated["kind"], "preventive");

    // Listing filtered by equipment
    let listed: Value = client
        .get(format!("{}/maintenance?equipoId={}", BASE_URL, equipment["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    // The label resolves back to the person
    let label = format!("{} — Pérez, Ana María", person["national_id"].as_str().unwrap_or_default());
    let resolved: Value = client
        .get(format!("{}/maintenance-people/resolve", BASE_URL))
        .query(&[("label", label)])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(resolved["id"], person["id"]);

    // Parents in use cannot be deleted
    assert_eq!(delete(&client, &token, &format!("/maintenance-people/{}", person["id"])).await, 409);
    assert_eq!(delete(&client, &token, &format!("/locations/{}", location["id"])).await, 409);

    // Equipment deletion takes its maintenance history with it
    assert_eq!(delete(&client, &token, &format!("/equipment/{}", equipment["id"])).await, 204);
    let gone = client
        .get(format!("{}/maintenance/{}", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(gone.status(), 404);

    assert_eq!(delete(&client, &token, &format!("/maintenance-people/{}", person["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/positions/{}", position["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/custodians/{}", custodian["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/locations/{}", location["id"])).await, 204);
}

async fn create_location(client: &Client, token: &str, tag: &str) -> Value {
    create(
        client,
        token,
        "/locations",
        json!({ "code": format!("LOC-{}", tag), "site": "Norte", "building": "B", "floor": "1", "room": "101" }),
    )
    .await
}

fn equipment_body(tag: &str, location: &Value, custodian: &Value) -> Value {
    json!({
        "inventory_code": format!("INV-{}", tag),
        "serial": format!("SN-{}", tag),
        "brand": "HP",
        "model": "ProDesk",
        "equipment_type": "desktop",
        "state": "operational",
        "location_id": location["id"],
        "custodian_id": custodian["id"]
    })
}

#[tokio::test]
#[ignore]
async fn test_duplicate_inventory_code() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tag = unique();

    let location = create_location(&client, &token, &tag).await;
    let custodian = create(
        &client,
        &token,
        "/custodians",
        json!({ "area_code": format!("AR-{}", tag), "area_name": "Compras" }),
    )
    .await;
    let equipment = create(&client, &token, "/equipment", equipment_body(&tag, &location, &custodian)).await;

    let mut again = equipment_body(&tag, &location, &custodian);
    again["serial"] = json!(format!("SN2-{}", tag));
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(&token)
        .json(&again)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].to_string();
    assert!(errors.contains("inventory_code"), "{}", errors);

    assert_eq!(delete(&client, &token, &format!("/equipment/{}", equipment["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/custodians/{}", custodian["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/locations/{}", location["id"])).await, 204);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_duplicate_creates() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tag = unique();

    let location = create_location(&client, &token, &tag).await;
    let custodian = create(
        &client,
        &token,
        "/custodians",
        json!({ "area_code": format!("AR-{}", tag), "area_name": "Archivo" }),
    )
    .await;
    let body = equipment_body(&tag, &location, &custodian);

    let post = || {
        client
            .post(format!("{}/equipment", BASE_URL))
            .bearer_auth(&token)
            .json(&body)
            .send()
    };
    let (first, second) = tokio::join!(post(), post());
    let first = first.expect("Failed to send request");
    let second = second.expect("Failed to send request");

    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 400]);

    let (created, rejected) = if first.status() == 201 { (first, second) } else { (second, first) };
    let rejected: Value = rejected.json().await.expect("Failed to parse response");
    assert!(rejected["errors"].to_string().contains("already"), "{}", rejected);
    let created: Value = created.json().await.expect("Failed to parse response");

    assert_eq!(delete(&client, &token, &format!("/equipment/{}", created["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/custodians/{}", custodian["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/locations/{}", location["id"])).await, 204);
}

#[tokio::test]
#[ignore]
async fn test_location_delete_after_reassignment() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tag = unique();

    let old_location = create_location(&client, &token, &tag).await;
    let new_location = create_location(&client, &token, &format!("{}-new", tag)).await;
    let custodian = create(
        &client,
        &token,
        "/custodians",
        json!({ "area_code": format!("AR-{}", tag), "area_name": "Bodega" }),
    )
    .await;
    let equipment = create(&client, &token, "/equipment", equipment_body(&tag, &old_location, &custodian)).await;

    let blocked = client
        .delete(format!("{}/locations/{}", BASE_URL, old_location["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(blocked.status(), 409);

    let moved = client
        .put(format!("{}/equipment/{}", BASE_URL, equipment["id"]))
        .bearer_auth(&token)
        .json(&json!({ "location_id": new_location["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(moved.status().is_success());

    assert_eq!(delete(&client, &token, &format!("/locations/{}", old_location["id"])).await, 204);

    assert_eq!(delete(&client, &token, &format!("/equipment/{}", equipment["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/custodians/{}", custodian["id"])).await, 204);
    assert_eq!(delete(&client, &token, &format!("/locations/{}", new_location["id"])).await, 204);
}

#[tokio::test]
#[ignore]
async fn test_enum_registry() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let registry: Value = client
        .get(format!("{}/enums", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let priority = registry
        .as_array()
        .and_then(|entries| entries.iter().find(|e| e["field"] == "maintenance_priority"))
        .expect("priority entry");
    assert_eq!(priority["default"], "medium");
}
