//! HTTP tests against the router with an in-memory printer

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono_tz::Tz;
use serde_json::{Value, json};
use taskslip_printer::{MemoryPrinter, Printer};
use taskslip_server::{PrinterManager, PrinterSettings, ServerState, api};
use tower::ServiceExt;

fn app_with_printer(tz: Tz) -> (Router, MemoryPrinter) {
    let printer = MemoryPrinter::new();
    let transport = printer.clone();
    let manager = PrinterManager::new();
    manager
        .initialize_with(&PrinterSettings::new(0x0416, 0x5011), move |_| {
            Ok(Box::new(transport) as Box<dyn Printer>)
        })
        .unwrap();

    let state = ServerState::with_manager(Arc::new(manager), tz);
    (api::router(state), printer)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(body: &'static str) -> Request<Body> {
    Request::post("/print")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn printed(printer: &MemoryPrinter) -> String {
    String::from_utf8_lossy(&printer.bytes()).into_owned()
}

#[tokio::test]
async fn test_index_serves_form() {
    let (app, _) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/print\">"));
}

#[tokio::test]
async fn test_json_print_success() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_json(
            "/api/print",
            json!({ "title": "Buy milk", "due_at": "2024-03-05T14:30" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "success" }));

    let text = printed(&printer);
    assert!(text.contains("Buy milk"));
    assert!(text.contains("Due: 2024-03-05 14:30"));
    assert!(text.contains("Priority: MEDIUM"));
    assert!(printer.bytes().ends_with(&[0x1D, 0x56, 0x00]));
}

#[tokio::test]
async fn test_json_legacy_field_names() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_json(
            "/api/print",
            json!({
                "title": "Review PR",
                "description": "Check the migration",
                "created_on": "2024-03-01T09:00:00",
                "due_by": "2024-03-02T17:00:00",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = printed(&printer);
    assert!(text.contains("Created: 2024-03-01 09:00"));
    assert!(text.contains("Due: 2024-03-02 17:00"));
    assert!(text.contains("Check the migration"));
}

#[tokio::test]
async fn test_offset_timestamp_shown_in_display_zone() {
    let (app, printer) = app_with_printer(chrono_tz::Europe::Madrid);

    let response = app
        .oneshot(post_json(
            "/api/print",
            json!({ "title": "Standup", "due_at": "2024-03-05T13:30:00Z" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(printed(&printer).contains("Due: 2024-03-05 14:30"));
}

#[tokio::test]
async fn test_json_empty_title_rejected() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_json("/api/print", json!({ "title": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["detail"], "Title must not be empty");
    assert!(printer.chunks().is_empty());
}

#[tokio::test]
async fn test_json_control_only_title_rejected() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_json("/api/print", json!({ "title": "\u{1b}\u{7}" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Title must not be empty");
    assert!(printer.chunks().is_empty());
}

#[tokio::test]
async fn test_json_bad_priority_rejected() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_json(
            "/api/print",
            json!({ "title": "x", "priority": "urgent" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(printer.chunks().is_empty());
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let (app, _) = app_with_printer(Tz::UTC);

    let request = Request::post("/api/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_hardware_error_is_503() {
    let (app, printer) = app_with_printer(Tz::UTC);
    printer.set_offline(true);

    let response = app
        .oneshot(post_json("/api/print", json!({ "title": "Lost card" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["detail"].as_str().unwrap().starts_with("Error printing"));
}

#[tokio::test]
async fn test_printer_recovers_after_failure() {
    let (app, printer) = app_with_printer(Tz::UTC);
    printer.fail_next(1);

    let first = app
        .clone()
        .oneshot(post_json("/api/print", json!({ "title": "First" })))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::SERVICE_UNAVAILABLE);

    let second = app
        .oneshot(post_json("/api/print", json!({ "title": "Second" })))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert!(printed(&printer).contains("Second"));
}

#[tokio::test]
async fn test_uninitialized_printer_is_500() {
    let state = ServerState::with_manager(Arc::new(PrinterManager::new()), Tz::UTC);
    let app = api::router(state);

    let response = app
        .oneshot(post_json("/api/print", json!({ "title": "Nowhere" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_form_print_confirmation() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_form(
            "title=Water+plants&notes=Balcony+%26+kitchen&due_at=2024-03-05T14%3A30&priority=HIGH",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Task printed"));
    assert!(html.contains("Balcony &amp; kitchen"));
    assert!(html.contains("HIGH"));

    let text = printed(&printer);
    assert!(text.contains("Priority: HIGH"));
    assert!(text.contains("Balcony & kitchen"));
}

#[tokio::test]
async fn test_form_bad_date_is_400_page() {
    let (app, printer) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(post_form("title=Report&due_at=soon"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Invalid date/time: soon"));
    assert!(printer.chunks().is_empty());
}

#[tokio::test]
async fn test_health_reports_printer() {
    let (app, _) = app_with_printer(Tz::UTC);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["printer"]["state"], "ready");
    assert_eq!(body["printer"]["online"], true);
    assert_eq!(body["printer"]["busy"], false);
    assert_eq!(body["printer"]["profile"], "default");
    assert_eq!(body["printer"]["columns"], 42);
}

#[tokio::test]
async fn test_health_without_printer() {
    let state = ServerState::with_manager(Arc::new(PrinterManager::new()), Tz::UTC);

    let response = api::router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["printer"]["state"], "uninitialized");
    assert_eq!(body["printer"]["profile"], Value::Null);
}
