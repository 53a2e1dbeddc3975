//! Behavioural tests for WebSocket upgrade validation.

mod support;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::header::HeaderValue;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use backend::inbound::http::users::login;
use backend::inbound::ws;
use rstest::rstest;
use serde_json::json;
use support::{http_state, record, store_with, ws_state};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let store = store_with([record("u-a", "a@x.com", "A", "B", "CoopCoffee")]);
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(&store)))
            .app_data(web::Data::new(ws_state(&store)))
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .service(web::scope("/api/v1").service(login))
            .service(ws::ws_entry),
    )
    .await
}

async fn session_cookie(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
) -> Cookie<'static> {
    let response = test::call_service(
        app,
        TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "a@x.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn handshake_request() -> TestRequest {
    TestRequest::get()
        .uri("/ws")
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Origin header shapes rejected before the session is consulted.
enum OriginHeaderCase {
    /// No Origin header present.
    Missing,
    /// Origin not in the allowlist.
    Unlisted,
    /// Multiple Origin headers (forbidden by RFC 6455).
    Multiple,
    /// Malformed Origin header (invalid UTF-8).
    Malformed,
    /// Localhost with port 0 (not a valid listening port).
    LocalhostZeroPort,
}

fn with_origin_case(request: TestRequest, origin_case: OriginHeaderCase) -> Request {
    match origin_case {
        OriginHeaderCase::Missing => request.to_request(),
        OriginHeaderCase::Unlisted => request
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Multiple => request
            .append_header((header::ORIGIN, "https://coco.ph"))
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Malformed => {
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            request.insert_header((header::ORIGIN, invalid)).to_request()
        }
        OriginHeaderCase::LocalhostZeroPort => request
            .insert_header((header::ORIGIN, "http://localhost:0"))
            .to_request(),
    }
}

#[rstest]
#[case("https://coco.ph")]
#[case("https://app.coco.ph")]
#[case("http://localhost:3000")]
#[actix_web::test]
async fn upgrades_when_origin_allowed_and_logged_in(#[case] origin: &str) {
    let app = init_app().await;
    let cookie = session_cookie(&app).await;

    let req = handshake_request()
        .insert_header((header::ORIGIN, origin))
        .cookie(cookie)
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(
        response.status(),
        StatusCode::SWITCHING_PROTOCOLS,
        "origin {origin}"
    );
}

#[actix_web::test]
async fn rejects_upgrade_without_session() {
    let app = init_app().await;

    let req = handshake_request()
        .insert_header((header::ORIGIN, "https://coco.ph"))
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(OriginHeaderCase::Missing, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Unlisted, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Multiple, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::Malformed, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::LocalhostZeroPort, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn rejects_disallowed_origin_headers(
    #[case] origin_case: OriginHeaderCase,
    #[case] expected: StatusCode,
) {
    let app = init_app().await;
    let cookie = session_cookie(&app).await;

    let req = with_origin_case(handshake_request().cookie(cookie), origin_case);
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), expected, "{origin_case:?}");
}
