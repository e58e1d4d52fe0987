//! API integration tests
//!
//! These run against a live server with a fresh database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create a catalog with the given number of copies, returning (catalog_id, book_ids)
async fn create_catalog(client: &Client, title: &str, copies: usize) -> (i64, Vec<i64>) {
    let barcodes: Vec<String> = (0..copies)
        .map(|i| format!("{}-{}-{}", title.replace(' ', "-"), i, rand_suffix()))
        .collect();

    let response = client
        .post(format!("{}/catalogs", BASE_URL))
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "barcodes": barcodes,
        }))
        .send()
        .await
        .expect("Failed to create catalog");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse catalog");
    let catalog_id = body["id"].as_i64().expect("No catalog ID");

    let response = client
        .get(format!("{}/catalogs/{}", BASE_URL, catalog_id))
        .send()
        .await
        .expect("Failed to get catalog");
    let details: Value = response.json().await.expect("Failed to parse details");
    let book_ids = details["books"]
        .as_array()
        .expect("No books array")
        .iter()
        .map(|b| b["id"].as_i64().expect("No book ID"))
        .collect();

    (catalog_id, book_ids)
}

async fn create_member(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create member");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse member");
    body["id"].as_i64().expect("No member ID")
}

async fn get_catalog(client: &Client, id: i64) -> Value {
    let response = client
        .get(format!("{}/catalogs/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to get catalog");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse catalog")
}

fn rand_suffix() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test]
#[ignore]
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
async fn test_list_catalogs() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalogs", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_restores_counters() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Borrow Return", 3).await;
    let member_id = create_member(&client, "Borrower One").await;

    // Borrow two copies
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
                { "catalog_id": catalog_id, "book_id": book_ids[1], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);

    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 1);
    assert_eq!(catalog["borrow_count"], 2);

    // Return the loan
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 3);
    assert_eq!(catalog["borrow_count"], 0);

    // The copies are available again
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_ids[0]))
        .send()
        .await
        .expect("Failed to get book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_second_active_loan_rejected() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "One Loan Rule", 2).await;
    let member_id = create_member(&client, "Busy Member").await;

    let loan = |book_id: i64| {
        json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_id, "condition_out": "good" },
            ],
        })
    };

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&loan(book_ids[0]))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&loan(book_ids[1]))
        .send()
        .await
        .expect("Failed to send second loan");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_borrowed_book_cannot_be_borrowed_again() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Double Borrow", 1).await;
    let member_a = create_member(&client, "Member A").await;
    let member_b = create_member(&client, "Member B").await;

    let loan = |member_id: i64| {
        json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
            ],
        })
    };

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&loan(member_a))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&loan(member_b))
        .send()
        .await
        .expect("Failed to send conflicting loan");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_edit_loan_swaps_books_across_catalogs() {
    let client = Client::new();
    let (catalog_a, books_a) = create_catalog(&client, "Swap Source", 2).await;
    let (catalog_b, books_b) = create_catalog(&client, "Swap Target", 2).await;
    let member_id = create_member(&client, "Swapper").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_a, "book_id": books_a[0], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    // Swap the item to the other catalog
    let response = client
        .put(format!("{}/loans/{}", BASE_URL, loan_id))
        .json(&json!({
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "borrowing_fee": "0",
            "is_paid": false,
            "is_returned": false,
            "items": [
                { "catalog_id": catalog_b, "book_id": books_b[0], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to edit loan");
    assert!(response.status().is_success());

    let cat_a = get_catalog(&client, catalog_a).await;
    assert_eq!(cat_a["available_copies"], 2);
    assert_eq!(cat_a["borrow_count"], 0);

    let cat_b = get_catalog(&client, catalog_b).await;
    assert_eq!(cat_b["available_copies"], 1);
    assert_eq!(cat_b["borrow_count"], 1);

    // The released copy is free again, the claimed one is out
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, books_a[0]))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["status"], "available");

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, books_b[0]))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["status"], "on_loan");
}

#[tokio::test]
#[ignore]
async fn test_unreturn_reclaims_books() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Unreturn", 1).await;
    let member_id = create_member(&client, "Regretful").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/loans/{}/unreturn", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to unreturn loan");
    assert!(response.status().is_success());

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 0);
    assert_eq!(catalog["borrow_count"], 1);

    let loan: Value = client
        .get(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to get loan")
        .json()
        .await
        .expect("Failed to parse loan");
    assert_eq!(loan["is_returned"], false);
}

#[tokio::test]
#[ignore]
async fn test_delete_active_loan_reverses_counters() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Delete Active", 2).await;
    let member_id = create_member(&client, "Deleter").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
                { "catalog_id": catalog_id, "book_id": book_ids[1], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to delete loan");
    assert_eq!(response.status(), 204);

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 2);
    assert_eq!(catalog["borrow_count"], 0);

    // History rows for the loan are gone too
    let histories: Value = client
        .get(format!(
            "{}/histories?entity_type=book_borrow&entity_id={}",
            BASE_URL, loan_id
        ))
        .send()
        .await
        .expect("Failed to list histories")
        .json()
        .await
        .expect("Failed to parse histories");
    assert_eq!(histories.as_array().expect("Not an array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_library_log_workflow() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Reading Room", 2).await;

    // Create a pending log
    let response = client
        .post(format!("{}/library-logs", BASE_URL))
        .json(&json!({
            "student_name": "Reader",
            "visit_date": "2026-08-20",
            "book_ids": [book_ids[0], book_ids[1]],
        }))
        .send()
        .await
        .expect("Failed to create log");
    assert_eq!(response.status(), 201);
    let log: Value = response.json().await.expect("Failed to parse log");
    let log_id = log["id"].as_i64().expect("No log ID");
    assert_eq!(log["status"], "pending");

    // Pending logs hold no books
    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 2);
    assert_eq!(catalog["in_library_count"], 0);

    // Approve claims the books; available_copies is untouched, the books
    // are blocked through their status instead
    let response = client
        .post(format!("{}/library-logs/{}/approve", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to approve log");
    assert!(response.status().is_success());

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 2);
    assert_eq!(catalog["in_library_count"], 2);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_ids[0]))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["status"], "in_library");

    // Approving twice is rejected
    let response = client
        .post(format!("{}/library-logs/{}/approve", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to send duplicate approve");
    assert_eq!(response.status(), 422);

    // Partial return frees one copy, log stays approved
    let response = client
        .post(format!("{}/library-logs/{}/return", BASE_URL, log_id))
        .json(&json!({ "book_ids": [book_ids[0]] }))
        .send()
        .await
        .expect("Failed to return item");
    assert!(response.status().is_success());
    let log: Value = response.json().await.expect("Failed to parse log");
    assert_eq!(log["status"], "approved");

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_ids[0]))
        .send()
        .await
        .expect("Failed to get book")
        .json()
        .await
        .expect("Failed to parse book");
    assert_eq!(book["status"], "available");

    // Returning the rest closes the log
    let response = client
        .post(format!("{}/library-logs/{}/return", BASE_URL, log_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return remainder");
    assert!(response.status().is_success());
    let log: Value = response.json().await.expect("Failed to parse log");
    assert_eq!(log["status"], "returned");

    // One ledger row per log, overwritten in place
    let histories: Value = client
        .get(format!(
            "{}/histories?entity_type=library_log&entity_id={}",
            BASE_URL, log_id
        ))
        .send()
        .await
        .expect("Failed to list histories")
        .json()
        .await
        .expect("Failed to parse histories");
    assert_eq!(histories.as_array().expect("Not an array").len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_log_to_pending_releases_books() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Reset Log", 1).await;

    let response = client
        .post(format!("{}/library-logs", BASE_URL))
        .json(&json!({
            "student_name": "Resetter",
            "visit_date": "2026-08-21",
            "book_ids": [book_ids[0]],
        }))
        .send()
        .await
        .expect("Failed to create log");
    assert_eq!(response.status(), 201);
    let log: Value = response.json().await.expect("Failed to parse log");
    let log_id = log["id"].as_i64().expect("No log ID");

    let response = client
        .post(format!("{}/library-logs/{}/approve", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to approve log");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/library-logs/{}/to-pending", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to reset log");
    assert!(response.status().is_success());
    let log: Value = response.json().await.expect("Failed to parse log");
    assert_eq!(log["status"], "pending");
    assert!(log["approved_at"].is_null());

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 1);
    assert_eq!(catalog["in_library_count"], 0);
}

#[tokio::test]
#[ignore]
async fn test_loan_history_appends_per_action() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Ledger Trail", 1).await;
    let member_id = create_member(&client, "Ledger Member").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    // borrow_home then return_home, two distinct rows
    let histories: Value = client
        .get(format!(
            "{}/histories?entity_type=book_borrow&entity_id={}",
            BASE_URL, loan_id
        ))
        .send()
        .await
        .expect("Failed to list histories")
        .json()
        .await
        .expect("Failed to parse histories");
    let rows = histories.as_array().expect("Not an array");
    assert_eq!(rows.len(), 2);
    let actions: Vec<&str> = rows.iter().map(|r| r["action"].as_str().unwrap()).collect();
    assert!(actions.contains(&"borrow_home"));
    assert!(actions.contains(&"return_home"));
}

#[tokio::test]
#[ignore]
async fn test_double_return_rejected_without_inventory_change() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Return Twice", 2).await;
    let member_id = create_member(&client, "Prompt Returner").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
                { "catalog_id": catalog_id, "book_id": book_ids[1], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 2);
    assert_eq!(catalog["borrow_count"], 0);

    // Second return is rejected and moves nothing
    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send second return");
    assert_eq!(response.status(), 422);

    let catalog = get_catalog(&client, catalog_id).await;
    assert_eq!(catalog["available_copies"], 2);
    assert_eq!(catalog["borrow_count"], 0);
}

#[tokio::test]
#[ignore]
async fn test_delete_pending_log_only() {
    let client = Client::new();
    let (_, book_ids) = create_catalog(&client, "Deletable Log", 2).await;

    // A pending log can be deleted, and its ledger row goes with it
    let response = client
        .post(format!("{}/library-logs", BASE_URL))
        .json(&json!({
            "student_name": "Short Visit",
            "visit_date": "2026-08-22",
            "book_ids": [book_ids[0]],
        }))
        .send()
        .await
        .expect("Failed to create log");
    assert_eq!(response.status(), 201);
    let log: Value = response.json().await.expect("Failed to parse log");
    let log_id = log["id"].as_i64().expect("No log ID");

    let response = client
        .delete(format!("{}/library-logs/{}", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to delete log");
    assert_eq!(response.status(), 204);

    let histories: Value = client
        .get(format!(
            "{}/histories?entity_type=library_log&entity_id={}",
            BASE_URL, log_id
        ))
        .send()
        .await
        .expect("Failed to list histories")
        .json()
        .await
        .expect("Failed to parse histories");
    assert_eq!(histories.as_array().expect("Not an array").len(), 0);

    // An approved log cannot be deleted
    let response = client
        .post(format!("{}/library-logs", BASE_URL))
        .json(&json!({
            "student_name": "Long Visit",
            "visit_date": "2026-08-22",
            "book_ids": [book_ids[1]],
        }))
        .send()
        .await
        .expect("Failed to create log");
    assert_eq!(response.status(), 201);
    let log: Value = response.json().await.expect("Failed to parse log");
    let log_id = log["id"].as_i64().expect("No log ID");

    let response = client
        .post(format!("{}/library-logs/{}/approve", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to approve log");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/library-logs/{}", BASE_URL, log_id))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_delete_member_with_loan_history_rejected() {
    let client = Client::new();
    let (catalog_id, book_ids) = create_catalog(&client, "Member History", 1).await;
    let member_id = create_member(&client, "Former Borrower").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": book_ids[0], "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);
    let loan: Value = response.json().await.expect("Failed to parse loan");
    let loan_id = loan["id"].as_i64().expect("No loan ID");

    let response = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    // The loan is settled but still on record, so the member stays
    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 422);

    // Dropping the loan record frees the member for deletion
    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to delete loan");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, member_id))
        .send()
        .await
        .expect("Failed to delete member");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_loan_with_unknown_book_is_not_found() {
    let client = Client::new();
    let (catalog_id, _) = create_catalog(&client, "Unknown Book", 1).await;
    let member_id = create_member(&client, "Optimist").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({
            "member_id": member_id,
            "loan_date": "2026-08-01",
            "due_date": "2026-08-15",
            "items": [
                { "catalog_id": catalog_id, "book_id": 999999999, "condition_out": "good" },
            ],
        }))
        .send()
        .await
        .expect("Failed to send loan");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["catalogs"]["total"].is_number());
    assert!(body["members"]["total"].is_number());
    assert!(body["loans"]["active"].is_number());
    assert!(body["library_logs"]["pending"].is_number());
}
