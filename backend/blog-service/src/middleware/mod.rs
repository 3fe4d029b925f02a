/// Middleware implementations
pub mod jwt_auth;

// Middleware modules:
// - jwt_auth: Bearer token verification and claims extraction
// - Request logging: handled by tracing_actix_web::TracingLogger
// - CORS: handled by actix_cors::Cors

pub use jwt_auth::{AuthenticatedUser, JwtAuthMiddleware};
