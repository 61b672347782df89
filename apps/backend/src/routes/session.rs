use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{Session, ValidatedJson};
use crate::session::claims::is_lifecycle_claim;
use crate::session::{JwtSession, SessionClaims};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Option<String>,
    pub status: &'static str,
    pub restored: bool,
    pub claims: SessionClaims,
    /// Stable code of the last rejected inbound token
    pub last_error: Option<&'static str>,
}

impl From<&JwtSession> for SessionResponse {
    fn from(session: &JwtSession) -> Self {
        Self {
            id: session.id().map(str::to_owned),
            status: session.status().as_str(),
            restored: session.is_restored(),
            claims: session.claims().clone(),
            last_error: session.last_error().map(|e| e.code()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub sub: String,
    pub aud: Option<Value>,
}

async fn get_session(session: Session) -> Result<HttpResponse, AppError> {
    let body = SessionResponse::from(&*session.borrow());
    Ok(HttpResponse::Ok().json(body))
}

/// Merge application claims. A `null` value removes the claim.
async fn patch_session(
    session: Session,
    body: ValidatedJson<Value>,
) -> Result<HttpResponse, AppError> {
    let Value::Object(updates) = body.into_inner() else {
        return Err(AppError::invalid(
            ErrorCode::InvalidClaims,
            "Body must be a JSON object of claims",
        ));
    };

    if let Some(reserved) = updates.keys().find(|name| is_lifecycle_claim(name)) {
        return Err(AppError::invalid(
            ErrorCode::ReservedClaim,
            format!("Claim '{reserved}' is managed by the session"),
        ));
    }

    for (name, value) in updates {
        if value.is_null() {
            session.remove(&name)?;
        } else {
            session.insert(name, value)?;
        }
    }

    tracing::debug!("session claims updated");
    let body = SessionResponse::from(&*session.borrow());
    Ok(HttpResponse::Ok().json(body))
}

async fn regenerate_session(session: Session) -> Result<HttpResponse, AppError> {
    session.regenerate()?;
    let body = SessionResponse::from(&*session.borrow());
    Ok(HttpResponse::Ok().json(body))
}

async fn destroy_session(session: Session) -> Result<HttpResponse, AppError> {
    session.destroy()?;
    Ok(HttpResponse::NoContent().finish())
}

async fn get_subject(session: Session) -> Result<HttpResponse, AppError> {
    let guard = session.borrow();
    let claims = guard.claims();
    let sub = claims.sub().ok_or_else(AppError::unauthorized)?;

    Ok(HttpResponse::Ok().json(SubjectResponse {
        sub: sub.to_string(),
        aud: claims.get(crate::session::claims::AUD).cloned(),
    }))
}

/// Routes relative to the `/session` scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_session))
            .route(web::patch().to(patch_session))
            .route(web::delete().to(destroy_session)),
    )
    .route("/regenerate", web::post().to(regenerate_session))
    .route("/subject", web::get().to(get_subject));
}
