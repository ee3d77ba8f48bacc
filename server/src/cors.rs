use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use tracing::error;

use crate::config::Config;

pub fn create_cors(config: &Config) -> Option<rocket_cors::Cors> {
    let allowed_origins = AllowedOrigins::some_exact(&config.cors_allowed_origins);

    let cors = CorsOptions {
        allowed_origins,
        allowed_methods: [Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(|m| m.into())
            .collect(),
        allowed_headers: AllowedHeaders::some(&[
            "Accept",
            "Content-Type",
            "X-User-Id",
            "X-User-Name",
            "X-User-Picture",
            "X-User-Email",
        ]),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors();

    match cors {
        Ok(cors) => Some(cors),
        Err(e) => {
            error!("Invalid CORS configuration, CORS disabled: {}", e);
            None
        }
    }
}
