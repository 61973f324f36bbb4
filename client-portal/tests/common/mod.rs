#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::NaiveDate;
use client_portal::config::{DashboardSettings, ServerSettings};
use client_portal::dashboard::FixedClock;
use client_portal::models::{
    BillingCycle, Client, Invoice, InvoiceStatus, Plan, Subscription, SubscriptionStatus,
};
use client_portal::services::gateway::{FixtureData, FixtureGateway, FixtureUser};
use client_portal::startup::{assemble_state, build_router, security_headers};
use secrecy::Secret;
use std::sync::Arc;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse battery";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn invoice(id: &str, status: InvoiceStatus, period_end: &str) -> Invoice {
    Invoice {
        invoice_id: id.to_string(),
        client_id: "c-1".to_string(),
        subscription_id: Some("s-1".to_string()),
        number: format!("INV-{}", id),
        period_start: "2026-09-01".to_string(),
        period_end: period_end.to_string(),
        amount_idr: 1_500_000,
        status,
        payment_due_date: "2026-10-26".to_string(),
        pdf_url: None,
    }
}

/// One client with an active subscription and invoices ending 5, 10, 40
/// and 1 days before [`today`].
pub fn fixture() -> FixtureData {
    FixtureData {
        users: vec![
            FixtureUser {
                id: "u-1".to_string(),
                email: EMAIL.to_string(),
                password: Secret::new(PASSWORD.to_string()),
            },
            FixtureUser {
                id: "u-2".to_string(),
                email: "newcomer@example.com".to_string(),
                password: Secret::new(PASSWORD.to_string()),
            },
        ],
        clients: vec![Client {
            client_id: "c-1".to_string(),
            user_id: "u-1".to_string(),
            name: "Ada".to_string(),
            company_name: Some("Analytical Engines".to_string()),
            email: EMAIL.to_string(),
        }],
        plans: vec![Plan {
            plan_id: "p-1".to_string(),
            name: "Growth".to_string(),
            price_idr: 1_500_000,
            price_eur: None,
            billing_cycle: BillingCycle::Monthly,
        }],
        subscriptions: vec![Subscription {
            subscription_id: "s-1".to_string(),
            client_id: "c-1".to_string(),
            plan_id: Some("p-1".to_string()),
            start_date: "2026-01-01".to_string(),
            renew_date: "2026-11-01".to_string(),
            status: SubscriptionStatus::Active,
            plan: None,
        }],
        invoices: vec![
            invoice("001", InvoiceStatus::Open, "2026-10-14"),
            invoice("002", InvoiceStatus::Paid, "2026-10-09"),
            invoice("003", InvoiceStatus::Paid, "2026-09-09"),
            invoice("004", InvoiceStatus::Void, "2026-10-18"),
        ],
    }
}

pub fn dashboard_settings() -> DashboardSettings {
    DashboardSettings {
        recent_paid_window_days: 30,
        invoice_limit: 10,
        support_email: "support@example.com".to_string(),
        billing_email: "billing@example.com".to_string(),
        avatar_base_url: "https://avatars.example/7.x/initials/svg".to_string(),
    }
}

pub fn server_settings() -> ServerSettings {
    ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: "static".to_string(),
        secure_cookies: false,
        session_idle_hours: 1,
    }
}

pub fn app() -> Router {
    let dashboard = dashboard_settings();
    let state = assemble_state(
        Arc::new(FixtureGateway::new(fixture())),
        Arc::new(FixedClock(today())),
        &dashboard,
    );
    build_router(
        state,
        &server_settings(),
        security_headers(&dashboard).unwrap(),
    )
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = format!(
        "email={}&password={}",
        urlencoding::encode(email),
        urlencoding::encode(password)
    );
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// `name=value` of the session cookie set on `response`.
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .expect("response sets a session cookie")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
