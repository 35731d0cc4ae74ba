mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use wedpay::adapters::auth::USER_ID_HEADER;
use wedpay::adapters::chapa::signature;
use wedpay::adapters::router;
use wedpay::domain::booking::BookingStatus;
use wedpay::domain::payment::PaymentStatus;

async fn send(w: &World, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = router(w.state()).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

fn webhook_request(body: &str, signature: Option<(&str, String)>) -> Request<Body> {
    let mut builder = Request::post("/api/payments/webhook").header("content-type", "application/json");
    if let Some((header, value)) = signature {
        builder = builder.header(header, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn signed(body: &str) -> String {
    signature::sign(WEBHOOK_SECRET.as_bytes(), body.as_bytes()).unwrap()
}

fn post_json(uri: &str, user: Uuid, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, user.to_string())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, user: Uuid) -> Request<Body> {
    Request::get(uri)
        .header(USER_ID_HEADER, user.to_string())
        .body(Body::empty())
        .unwrap()
}

// ── webhook ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn webhook_without_signature_is_401() {
    let w = World::new().await;
    let p = w.pending_payment("tx-h1", 100_000).await;

    let (status, body) = send(&w, webhook_request(r#"{"tx_ref":"tx-h1","status":"success"}"#, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"Missing signature");
    assert_eq!(w.payment_status(p.id).await, PaymentStatus::Pending);
}

#[tokio::test]
async fn webhook_with_tampered_body_is_401() {
    let w = World::new().await;
    let p = w.pending_payment("tx-h2", 100_000).await;
    let sig = signed(r#"{"tx_ref":"tx-h2","status":"failed"}"#);

    let (status, body) = send(
        &w,
        webhook_request(
            r#"{"tx_ref":"tx-h2","status":"success"}"#,
            Some(("x-chapa-signature", sig)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"Invalid signature");
    assert_eq!(w.payment_status(p.id).await, PaymentStatus::Pending);
    assert_eq!(w.booking_status().await, BookingStatus::Pending);
    assert_eq!(w.notifier.count(), 0);
}

#[tokio::test]
async fn webhook_with_valid_signature_completes_payment() {
    let w = World::new().await;
    let p = w.pending_payment("tx-h3", 100_000).await;
    let payload = r#"{"tx_ref":"tx-h3","status":"success","amount":"1000.00"}"#;

    let (status, body) = send(
        &w,
        webhook_request(payload, Some(("chapa-signature", signed(payload)))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    assert_eq!(w.payment_status(p.id).await, PaymentStatus::Completed);
    assert_eq!(w.booking_status().await, BookingStatus::Confirmed);
    assert_eq!(w.notifier.count(), 2);
}

#[tokio::test]
async fn webhook_for_unknown_payment_is_404() {
    let w = World::new().await;
    let payload = r#"{"tx_ref":"tx-unknown","status":"success"}"#;

    let (status, _) = send(
        &w,
        webhook_request(payload, Some(("x-chapa-signature", signed(payload)))),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_with_signed_garbage_is_400() {
    let w = World::new().await;
    let payload = r#"{"status":"success"}"#;

    let (status, body) = send(
        &w,
        webhook_request(payload, Some(("x-chapa-signature", signed(payload)))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Invalid payload");
}

// ── verify ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_returns_status_and_booking() {
    let w = World::new().await;
    let p = w.pending_payment("tx-h6", 150_000).await;

    let (status, body) = send(
        &w,
        post_json(
            "/api/payments/verify",
            w.client_user,
            serde_json::json!({ "paymentId": p.id, "tx_ref": "tx-h6" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["amount"], "1500.00");
    assert_eq!(body["paymentId"], p.id.to_string());
    assert_eq!(body["booking"]["status"], "CONFIRMED");
    assert_eq!(body["chapaData"]["data"]["tx_ref"], "tx-h6");
}

#[tokio::test]
async fn verify_by_non_owner_is_403() {
    let w = World::new().await;
    let p = w.pending_payment("tx-h7", 100_000).await;

    let (status, body) = send(
        &w,
        post_json(
            "/api/payments/verify",
            Uuid::now_v7(),
            serde_json::json!({ "paymentId": p.id, "tx_ref": "tx-h7" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json(&body)["error_code"], "forbidden");
    assert_eq!(w.payment_status(p.id).await, PaymentStatus::Pending);
}

#[tokio::test]
async fn verify_without_fields_is_400() {
    let w = World::new().await;

    let (status, body) = send(
        &w,
        post_json(
            "/api/payments/verify",
            w.client_user,
            serde_json::json!({ "paymentId": Uuid::now_v7() }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error_code"], "validation_error");
}

#[tokio::test]
async fn missing_identity_is_401() {
    let w = World::new().await;
    let req = Request::get("/api/payments").body(Body::empty()).unwrap();

    let (status, body) = send(&w, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error_code"], "unauthorized");
}

// ── initiate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn initiate_returns_201_with_checkout_url() {
    let w = World::new().await;

    let (status, body) = send(
        &w,
        post_json(
            "/api/payments/initiate",
            w.client_user,
            serde_json::json!({
                "amount": 1500,
                "vendorId": w.vendor.id,
                "bookingId": w.booking.id,
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = json(&body);
    assert_eq!(body["message"], "Payment initiated");
    let tx_ref = body["txRef"].as_str().unwrap();
    assert!(tx_ref.starts_with("wp-"));
    assert!(body["checkoutUrl"].as_str().unwrap().ends_with(tx_ref));
    assert!(body["paymentId"].is_string());
}

#[tokio::test]
async fn initiate_with_wrong_vendor_is_400() {
    let w = World::new().await;

    let (status, _) = send(
        &w,
        post_json(
            "/api/payments/initiate",
            w.client_user,
            serde_json::json!({
                "amount": "100.00",
                "vendorId": Uuid::now_v7(),
                "bookingId": w.booking.id,
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(w.store.payment_count().await, 0);
}

// ── listing ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_scoped_to_caller_and_paginated() {
    let w = World::new().await;
    for i in 0..3 {
        w.pending_payment(&format!("tx-l{i}"), 10_000).await;
    }

    let (status, body) = send(&w, get("/api/payments?limit=2&page=1", w.client_user)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["payments"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);

    // Vendor sees the same payments as recipient.
    let (_, body) = send(&w, get("/api/payments?status=pending", w.vendor_user)).await;
    assert_eq!(json(&body)["pagination"]["total"], 3);

    let (_, body) = send(&w, get("/api/payments", Uuid::now_v7())).await;
    assert_eq!(json(&body)["pagination"]["total"], 0);
}

#[tokio::test]
async fn list_rejects_bad_limit_and_status() {
    let w = World::new().await;

    let (status, _) = send(&w, get("/api/payments?limit=500", w.client_user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&w, get("/api/payments?status=settled", w.client_user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_payment_by_id() {
    let w = World::new().await;
    let p = w.pending_payment("tx-g1", 10_000).await;

    let (status, body) = send(&w, get(&format!("/api/payments/{}", p.id), w.vendor_user)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["txRef"], "tx-g1");
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["vendorAmount"], "90.00");

    let (status, _) = send(&w, get(&format!("/api/payments/{}", p.id), Uuid::now_v7())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&w, get(&format!("/api/payments/{}", Uuid::now_v7()), w.client_user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health() {
    let w = World::new().await;
    let (status, body) = send(&w, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}
