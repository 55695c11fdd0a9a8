//! Bearer token carried by the visitor's `token` cookie.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

/// Name of the cookie the sign-in flow stores the API token in.
pub const TOKEN_COOKIE: &str = "token";

/// Token read from the request cookies; empty when the visitor is anonymous.
///
/// Extraction never fails: handlers decide whether a token is required.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthToken(Option<String>);

impl AuthToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|token| !token.is_empty()))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl FromRequest for AuthToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string());
        ready(Ok(AuthToken::new(token)))
    }
}
