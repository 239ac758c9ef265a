//! Upgrade-time authentication for the gadget event gateway.

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use gadget_backend::inbound::ws;
use gadget_backend::test_support::TestHarness;
use rstest::{fixture, rstest};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

#[fixture]
fn harness() -> TestHarness {
    TestHarness::new()
}

async fn init_app(
    harness: &TestHarness,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(harness.ws_state()))
            .service(ws::gadget_events),
    )
    .await
}

fn handshake_request(uri: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Ways a client can present (or fail to present) its access token.
enum Credential {
    QueryToken,
    Cookie,
    Missing,
    Garbage,
    Expired,
    RefreshToken,
}

fn request_for(harness: &TestHarness, credential: Credential) -> Request {
    let alice = harness.alice();
    match credential {
        Credential::QueryToken => {
            let token = harness.access_token(alice);
            handshake_request(&format!("/ws/gadgets/?token={token}")).to_request()
        }
        Credential::Cookie => handshake_request("/ws/gadgets/")
            .cookie(Cookie::new("access_token", harness.access_token(alice)))
            .to_request(),
        Credential::Missing => handshake_request("/ws/gadgets/").to_request(),
        Credential::Garbage => handshake_request("/ws/gadgets/?token=not-a-jwt").to_request(),
        Credential::Expired => {
            let token = harness.expired_access_token(alice);
            handshake_request(&format!("/ws/gadgets/?token={token}")).to_request()
        }
        Credential::RefreshToken => {
            let token = harness.refresh_token(alice);
            handshake_request(&format!("/ws/gadgets/?token={token}")).to_request()
        }
    }
}

#[rstest]
#[case::query(Credential::QueryToken)]
#[case::cookie(Credential::Cookie)]
#[actix_web::test]
async fn valid_access_token_upgrades(harness: TestHarness, #[case] credential: Credential) {
    let app = init_app(&harness).await;

    let res = test::call_service(&app, request_for(&harness, credential)).await;

    assert_eq!(res.status(), StatusCode::SWITCHING_PROTOCOLS);
}

#[rstest]
#[case::missing(Credential::Missing)]
#[case::garbage(Credential::Garbage)]
#[case::expired(Credential::Expired)]
#[case::refresh_token(Credential::RefreshToken)]
#[actix_web::test]
async fn bad_credentials_are_forbidden_before_joining(
    harness: TestHarness,
    #[case] credential: Credential,
) {
    let app = init_app(&harness).await;

    let res = test::call_service(&app, request_for(&harness, credential)).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(harness.registry().group_count(), 0);
}
