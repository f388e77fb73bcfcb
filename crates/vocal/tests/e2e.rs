// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Vocal API.
//!
//! Each test creates an isolated TestHarness with temp SQLite and mock
//! identity/vendor adapters. Tests are independent and order-insensitive.

use std::time::Duration;

use axum::http::StatusCode;
use base64::Engine;
use serde_json::{Value, json};

use vocal_core::StorageAdapter;
use vocal_core::types::PageRequest;
use vocal_test_utils::TestHarness;
use vocal_test_utils::mock_vendor::MOCK_AUDIO;

async fn harness() -> TestHarness {
    TestHarness::builder().build().await.unwrap()
}

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

// ---- Scenario 1: upload, then generate ----

#[tokio::test]
async fn test_upload_then_generate_meditation() {
    let h = harness().await;
    let token = h.login("alice").await;

    let upload = h
        .upload(&token, b"ID3\x04\x00sample", "audio/mpeg", &[("durationSeconds", "42")])
        .await;
    assert_eq!(upload.status, StatusCode::CREATED);
    let model = &upload.body["voiceModel"];
    let voice_ref = model["externalVoiceRef"].as_str().unwrap();
    assert!(!voice_ref.is_empty());
    assert_eq!(upload.body["recordingQuality"], "good");

    let generated = h
        .post(
            "/api/voice/generate",
            &token,
            json!({"script": "Breathe in, breathe out.", "voiceId": voice_ref}),
        )
        .await;
    assert_eq!(generated.status, StatusCode::OK);
    assert_eq!(generated.body["estimatedDurationSeconds"], 2);

    let session = &generated.body["session"];
    assert_eq!(session["durationSeconds"], 2);
    assert_eq!(session["status"], "completed");
    assert_eq!(session["voiceModelId"], model["id"]);

    let audio = base64::engine::general_purpose::STANDARD
        .decode(generated.body["audioData"].as_str().unwrap())
        .unwrap();
    assert!(!audio.is_empty());
    assert_eq!(audio, MOCK_AUDIO);
    assert_eq!(h.vendor.synthesized_texts(), vec!["Breathe in, breathe out."]);

    let listed = h.get("/api/sessions", &token).await;
    assert_eq!(listed.body["pagination"]["total"], 1);
    assert_eq!(listed.body["sessions"][0], *session);
}

// ---- Scenario 2: journal paging ----

#[tokio::test]
async fn test_fifteen_journal_entries_page_two_has_five() {
    let h = harness().await;
    let token = h.login("alice").await;

    for i in 0..15 {
        let created = h
            .post(
                "/api/journal/entries",
                &token,
                json!({"title": format!("Day {i}"), "content": format!("entry {i}")}),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
    }

    let page2 = h.get("/api/journal/entries?page=2&limit=10", &token).await;
    assert_eq!(page2.status, StatusCode::OK);
    assert_eq!(page2.body["journalEntries"].as_array().unwrap().len(), 5);
    assert_eq!(
        page2.body["pagination"],
        json!({"page": 2, "limit": 10, "total": 15})
    );
}

// ---- Paging properties ----

#[tokio::test]
async fn test_pages_are_disjoint_and_reassemble_in_order() {
    let h = harness().await;
    let token = h.login("alice").await;
    let model = h.create_voice_model(&token).await;

    for i in 0..13 {
        h.post(
            "/api/sessions",
            &token,
            json!({"script": format!("script {i}"), "voiceModelId": model["id"]}),
        )
        .await;
    }

    let page1 = ids(&h.get("/api/sessions?page=1&limit=10", &token).await.body["sessions"]);
    let page2 = ids(&h.get("/api/sessions?page=2&limit=10", &token).await.body["sessions"]);
    let all = h.get("/api/sessions?page=1&limit=13", &token).await;
    assert_eq!(all.body["pagination"]["total"], 13);

    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 3);
    assert!(page1.iter().all(|id| !page2.contains(id)));

    let reassembled: Vec<String> = page1.into_iter().chain(page2).collect();
    assert_eq!(reassembled, ids(&all.body["sessions"]));
}

#[tokio::test]
async fn test_newest_entries_come_first() {
    let h = harness().await;
    let token = h.login("alice").await;

    for content in ["first", "second", "third"] {
        h.post("/api/journal/entries", &token, json!({"content": content}))
            .await;
    }
    let listed = h.get("/api/journal/entries", &token).await;
    let contents: Vec<&str> = listed.body["journalEntries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_with_total() {
    let h = harness().await;
    let token = h.login("alice").await;
    h.post("/api/journal/entries", &token, json!({"content": "only"}))
        .await;

    let response = h.get("/api/journal/entries?page=5", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["journalEntries"], json!([]));
    assert_eq!(response.body["pagination"]["total"], 1);
}

// ---- Ownership isolation ----

#[tokio::test]
async fn test_foreign_records_are_not_found_everywhere() {
    let h = harness().await;
    let alice = h.login("alice").await;
    let bob = h.login("bob").await;

    let model = h.create_voice_model(&alice).await;
    let session = h
        .post(
            "/api/sessions",
            &alice,
            json!({"script": "mine", "voiceModelId": model["id"]}),
        )
        .await
        .body["session"]
        .clone();
    let entry = h
        .post("/api/journal/entries", &alice, json!({"content": "private"}))
        .await
        .body["journalEntry"]
        .clone();

    let uris = [
        format!("/api/voice/models/{}", model["id"].as_str().unwrap()),
        format!("/api/sessions/{}", session["id"].as_str().unwrap()),
        format!("/api/journal/entries/{}", entry["id"].as_str().unwrap()),
    ];
    for uri in &uris {
        assert_eq!(h.get(uri, &bob).await.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(h.delete(uri, &bob).await.status, StatusCode::NOT_FOUND, "{uri}");
    }
    assert_eq!(
        h.put(&uris[1], &bob, json!({"title": "stolen"})).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        h.put(&uris[2], &bob, json!({"content": "stolen"})).await.status,
        StatusCode::NOT_FOUND
    );

    for uri in &uris {
        assert_eq!(h.get(uri, &alice).await.status, StatusCode::OK, "{uri}");
    }
    assert_eq!(h.get(&uris[1], &alice).await.body["session"]["title"], session["title"]);
    assert_eq!(h.vendor.delete_calls(), 0);
}

// ---- Partial updates ----

#[tokio::test]
async fn test_empty_update_only_advances_updated_at() {
    let h = harness().await;
    let token = h.login("alice").await;

    let entry = h
        .post(
            "/api/journal/entries",
            &token,
            json!({"title": "T", "content": "C", "mood": "ok", "tags": ["a"]}),
        )
        .await
        .body["journalEntry"]
        .clone();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let uri = format!("/api/journal/entries/{}", entry["id"].as_str().unwrap());
    let updated = h.put(&uri, &token, json!({})).await.body["journalEntry"].clone();

    for field in ["id", "ownerId", "title", "content", "mood", "tags", "createdAt"] {
        assert_eq!(updated[field], entry[field], "{field}");
    }
    assert!(updated["updatedAt"].as_str().unwrap() > entry["updatedAt"].as_str().unwrap());
}

// ---- Voice model deletion ----

#[tokio::test]
async fn test_vendor_delete_failure_still_removes_local_model() {
    let h = harness().await;
    let token = h.login("alice").await;
    let model = h.create_voice_model(&token).await;
    h.vendor.fail_delete(true);

    let uri = format!("/api/voice/models/{}", model["id"].as_str().unwrap());
    assert_eq!(h.delete(&uri, &token).await.status, StatusCode::OK);
    assert_eq!(h.vendor.delete_calls(), 1);
    assert_eq!(
        h.get("/api/voice/models", &token).await.body["voiceModels"],
        json!([])
    );
}

// ---- Orphan recovery ----

#[tokio::test]
async fn test_failed_local_write_leaves_reconcilable_orphan() {
    let h = harness().await;
    let token = h.login("alice").await;
    h.storage.fail_voice_model_writes(true);

    let response = h.upload(&token, b"ID3", "audio/mpeg", &[]).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(h.vendor.clone_calls(), 1);
    tokio::time::sleep(Duration::from_millis(5)).await;

    let report = h
        .studio
        .voices
        .reconcile_orphans(Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(h.vendor.deleted_voices(), vec!["mock-voice-1"]);

    let page = h
        .storage
        .list_sessions("alice", PageRequest { page: 1, limit: 10 })
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}
