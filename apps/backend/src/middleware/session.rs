//! Session middleware.
//!
//! Builds a [`JwtSession`] for every request from the shared configuration,
//! starts it before the handler runs and closes it afterwards. Outbound
//! tokens are parked in an [`Outbox`] and written to the response once the
//! handler is done, as a cookie or a header depending on the configured
//! transport.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::session::Session;
use crate::session::transport::{session_cookie, session_header};
use crate::session::{IssuedToken, JwtSession, Outbox, RequestTokenSource};
use crate::state::app_state::AppState;
use crate::state::session_config::TransportKind;

pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            let err: actix_web::Error =
                AppError::config("AppState is not registered as app data").into();
            return Box::pin(ready(Err(err)));
        };

        let config = state.session.clone();
        let source = RequestTokenSource::from_request(req.request(), &config.token_name, config.transport);
        let outbox = Outbox::new();

        let mut session = JwtSession::new(config.clone(), source, outbox.sink())
            .with_clock(state.clock.clone());
        if let Err(e) = session.start() {
            let err: actix_web::Error = AppError::from(e).into();
            return Box::pin(ready(Err(err)));
        }

        let session = Session::new(session);
        req.extensions_mut().insert(session.clone());

        let service = self.service.clone();
        Box::pin(async move {
            let mut res = service.call(req).await?;

            session.close().map_err(AppError::from)?;

            if let Some(token) = outbox.take() {
                debug!(
                    expired = token.is_expired_marker(),
                    transport = ?config.transport,
                    "applying session token to response"
                );
                apply_token(&mut res, &config.token_name, config.transport, &token)?;
            }

            Ok(res)
        })
    }
}

fn apply_token<B>(
    res: &mut ServiceResponse<B>,
    name: &str,
    transport: TransportKind,
    token: &IssuedToken,
) -> Result<(), AppError> {
    match transport {
        TransportKind::Cookie => res
            .response_mut()
            .add_cookie(&session_cookie(name, token))
            .map_err(|e| AppError::internal(ErrorCode::SessionTransport, e.to_string())),
        TransportKind::Header => {
            let (name, value) = session_header(name, token)
                .map_err(|e| AppError::internal(ErrorCode::SessionTransport, e.to_string()))?;
            res.headers_mut().insert(name, value);
            Ok(())
        }
    }
}
