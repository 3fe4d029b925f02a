/// JWT authentication middleware for Bearer token validation
/// Verifies the token with the shared `TokenService` and stores the claims in
/// request extensions
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use crypto_core::{bearer_token, Claims, TokenError};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::app_state::AppState;
use crate::error::AppError;

/// Verified identity of the caller
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

/// JWT authentication middleware factory
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let claims = match authenticate(&req) {
                Ok(claims) => claims,
                Err(err) => {
                    tracing::debug!(path = %req.path(), "Rejected request: {}", err);
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthenticatedUser(claims));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Verify the bearer token on `req` with the shared `TokenService`
fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let header = match req.headers().get("Authorization") {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Token(TokenError::InvalidToken))?,
        ),
        None => None,
    };
    let token = bearer_token(header)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState is not registered".to_string()))?;

    let claims = state.tokens.verify(token)?;
    tracing::debug!(user_id = claims.id, "Request authenticated");
    Ok(claims)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(AppError::Token(TokenError::MissingToken).into())),
        }
    }
}
