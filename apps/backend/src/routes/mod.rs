use actix_web::web;

pub mod health;
pub mod session;

/// Only `/session` runs under the session middleware; health checks and
/// unknown paths never mint tokens.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes).service(
        web::scope("/session")
            .wrap(crate::middleware::SessionMiddleware)
            .configure(session::configure_routes),
    );
}
