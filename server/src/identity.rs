use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use tracing::debug;

/// Caller identity as asserted by the fronting identity provider.
/// Trusted as-is; this server performs no authentication of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: None,
            picture: None,
            email: None,
        }
    }
}

fn header(req: &Request<'_>, name: &str) -> Option<String> {
    req.headers()
        .get_one(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Identity {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match header(req, "X-User-Id") {
            Some(uid) => request::Outcome::Success(Identity {
                uid,
                name: header(req, "X-User-Name"),
                picture: header(req, "X-User-Picture"),
                email: header(req, "X-User-Email"),
            }),
            None => {
                debug!("Rejecting request to {} without identity", req.uri());
                request::Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}
