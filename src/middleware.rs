use crate::session::SessionId;
use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};
use tracing::{trace, warn};

pub const SESSION_COOKIE: &str = "bedtime_session";

/// Attaches a [`SessionId`] to the request, issuing a cookie for new visitors.
pub async fn session<B>(mut req: Request<B>, next: Next<B>) -> Response {
    let existing = req
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .find_map(find_session_cookie);

    let (id, issued) = match existing {
        Some(id) => (id, false),
        None => {
            let id = SessionId::generate();
            trace!("Issuing new session {}", id.as_str());
            (id, true)
        }
    };

    req.extensions_mut().insert(id.clone());
    let mut response = next.run(req).await;

    if issued {
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            id.as_str()
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!("Could not build session cookie: {e}"),
        }
    }

    response
}

fn find_session_cookie(header: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}
