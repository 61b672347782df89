use std::cell::{Ref, RefCell, RefMut};
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde_json::Value;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::session::{IssuedToken, JwtSession, SessionClaims, SessionError, SessionHandler};

/// The request's live session, installed by `SessionMiddleware`.
///
/// Cloning shares the same session. Borrows must not be held across an
/// `.await`.
#[derive(Clone)]
pub struct Session(Rc<RefCell<JwtSession>>);

impl Session {
    pub fn new(session: JwtSession) -> Self {
        Self(Rc::new(RefCell::new(session)))
    }

    pub fn borrow(&self) -> Ref<'_, JwtSession> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, JwtSession> {
        self.0.borrow_mut()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn claims(&self) -> SessionClaims {
        self.0.borrow().claims().clone()
    }

    pub fn insert(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, SessionError> {
        self.0.borrow_mut().insert(name, value)
    }

    pub fn remove(&self, name: &str) -> Result<Option<Value>, SessionError> {
        self.0.borrow_mut().remove(name)
    }

    pub fn regenerate(&self) -> Result<IssuedToken, SessionError> {
        self.0.borrow_mut().regenerate()
    }

    pub fn destroy(&self) -> Result<(), SessionError> {
        self.0.borrow_mut().destroy()
    }

    pub fn close(&self) -> Result<(), SessionError> {
        self.0.borrow_mut().close()
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Session>().cloned().ok_or_else(|| {
            AppError::internal(
                ErrorCode::SessionUnavailable,
                "Session middleware is not installed for this route",
            )
        }))
    }
}
