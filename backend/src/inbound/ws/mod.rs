//! WebSocket inbound adapter streaming gadget mutations to their owner.
//!
//! Responsibilities:
//! - authenticate the upgrade request from `?token=` or the `access_token`
//!   cookie, refusing with a bare `403` before any group is joined
//! - join the caller's owner group and hand the socket to a session task
//! - keep WebSocket framing at the edge; fan-out lives in the registry

use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{error, info, warn};

use crate::domain::{AuthError, OwnerGroup, TraceId, UserId};
use crate::inbound::http::cookies::ACCESS_COOKIE;

pub mod lifecycle;
pub mod messages;
mod session;
pub mod state;

use lifecycle::ConnectionState;
use state::WsState;

/// Query parameter carrying the access token.
pub const TOKEN_QUERY_PARAM: &str = "token";

fn query_token(req: &HttpRequest) -> Option<String> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

fn cookie_token(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

fn authenticate(state: &WsState, req: &HttpRequest) -> Result<UserId, AuthError> {
    let token = query_token(req)
        .or_else(|| cookie_token(req))
        .ok_or(AuthError::AuthenticationFailed)?;
    state.tokens.validate_access(&token)
}

/// Upgrade `/ws/gadgets/` for an authenticated owner.
#[get("/ws/gadgets/")]
pub async fn gadget_events(
    state: web::Data<WsState>,
    req: HttpRequest,
    body: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let connecting = ConnectionState::Connecting;
    let owner = match authenticate(&state, &req) {
        Ok(owner) => owner,
        Err(_) => {
            let refused = connecting.on_auth(false);
            warn!(peer = ?req.peer_addr(), state = ?refused, "refusing unauthenticated WebSocket");
            return Ok(HttpResponse::Forbidden().finish());
        }
    };
    let authenticated = connecting.on_auth(true);

    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        err
    })?;

    let group = OwnerGroup::for_owner(owner);
    let (membership, events) = state.registry.join_group(group);
    let open = authenticated.on_joined();
    info!(
        group = %membership.group(),
        connection = ?membership.connection_id(),
        state = ?open,
        "WebSocket joined owner group"
    );

    let trace_id = TraceId::current_or_generate();
    actix_web::rt::spawn(TraceId::scope(
        trace_id,
        session::run(session, stream, membership, events, open),
    ));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("/ws/gadgets/?token=abc", Some("abc"))]
    #[case("/ws/gadgets/?other=1&token=a%2Bb", Some("a+b"))]
    #[case("/ws/gadgets/?token=", None)]
    #[case("/ws/gadgets/", None)]
    fn reads_token_from_query(#[case] uri: &str, #[case] expected: Option<&str>) {
        let req = TestRequest::get().uri(uri).to_http_request();
        assert_eq!(query_token(&req).as_deref(), expected);
    }

    #[rstest]
    fn falls_back_to_access_cookie() {
        let req = TestRequest::get()
            .uri("/ws/gadgets/")
            .cookie(Cookie::new(ACCESS_COOKIE, "from-cookie"))
            .to_http_request();
        assert_eq!(query_token(&req), None);
        assert_eq!(cookie_token(&req).as_deref(), Some("from-cookie"));
    }
}
