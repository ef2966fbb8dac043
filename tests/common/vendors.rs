//! Mock vendor APIs
//!
//! Each helper mounts one endpoint of a vendor on a `wiremock` server whose
//! URI the provider config points at through its `api_base` setting.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Avalara ping; `authenticated: false` makes the load-time probe fail
pub async fn avalara_ping(server: &MockServer, authenticated: bool) {
    Mock::given(method("GET"))
        .and(path("/utilities/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "24.6.0",
            "authenticated": authenticated
        })))
        .mount(server)
        .await;
}

/// Avalara transaction endpoint answering `status` after `delay`
pub async fn avalara_transactions(server: &MockServer, status: u16, delay: Duration) {
    let body = json!({
        "code": "INV-1001",
        "status": "Committed",
        "totalAmount": 100.0,
        "totalTaxable": 100.0,
        "totalTax": 10.1,
        "currencyCode": "USD",
        "lines": []
    });
    Mock::given(method("POST"))
        .and(path("/transactions/create"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn taxjar_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"categories": []})))
        .mount(server)
        .await;
}

/// TaxJar rate calculation, expecting exactly `calls` requests
pub async fn taxjar_taxes(server: &MockServer, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/taxes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tax": {
                "order_total_amount": 100.0,
                "taxable_amount": 100.0,
                "amount_to_collect": 10.1,
                "breakdown": {"line_items": []}
            }
        })))
        .expect(calls)
        .mount(server)
        .await;
}

pub async fn sendgrid_scopes(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/scopes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scopes": ["mail.send"]})))
        .mount(server)
        .await;
}

pub async fn sendgrid_send(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "sg-msg-1"))
        .mount(server)
        .await;
}
