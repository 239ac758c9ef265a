//! Request authentication for REST handlers.
//!
//! [`AuthenticatedUser`] resolves the caller from an
//! `Authorization: Bearer` header, falling back to the `access_token`
//! cookie. Every failure becomes the same `401` payload.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthError, Error, UserId};

use super::cookies::ACCESS_COOKIE;
use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Owner id of the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix(BEARER_PREFIX)
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty())
}

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let Some(token) = bearer_token(req).or_else(|| cookie_token(req)) else {
        debug!("request without access token");
        return Err(AuthError::AuthenticationFailed.into());
    };
    let user_id = state.tokens.validate_access(&token)?;
    Ok(AuthenticatedUser(user_id))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHarness;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.id().to_string())
    }

    async fn call(
        harness: &TestHarness,
        request: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(harness.http_state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        test::call_service(&app, request.uri("/whoami").to_request()).await
    }

    #[actix_web::test]
    async fn bearer_header_identifies_caller() {
        let harness = TestHarness::new();
        let token = harness.access_token(harness.alice());

        let res = call(
            &harness,
            test::TestRequest::get()
                .insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, harness.alice().to_string().as_bytes());
    }

    #[actix_web::test]
    async fn access_cookie_is_the_fallback() {
        let harness = TestHarness::new();
        let token = harness.access_token(harness.bob());

        let res = call(
            &harness,
            test::TestRequest::get().cookie(Cookie::new(ACCESS_COOKIE, token)),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::garbage(Some("Bearer not-a-jwt"))]
    #[case::wrong_scheme(Some("Basic dXNlcjpwYXNz"))]
    #[actix_web::test]
    async fn bad_credentials_are_unauthorized(#[case] header: Option<&str>) {
        let harness = TestHarness::new();
        let mut request = test::TestRequest::get();
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }

        let res = call(&harness, request).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn expired_token_is_unauthorized() {
        let harness = TestHarness::new();
        let token = harness.expired_access_token(harness.alice());

        let res = call(
            &harness,
            test::TestRequest::get().insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
