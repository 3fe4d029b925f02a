/// OpenAPI documentation for blog-service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::{auth, health, posts};
use crate::models::{Post, PublicUser};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "Multi-user blog backend. Users register and log in to receive a bearer token; posts are readable by anyone and may be modified only by their author or an administrator.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server"),
    ),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        posts::create_post,
        posts::list_posts,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
    ),
    components(schemas(
        PublicUser,
        Post,
        ErrorResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::RegisterResponse,
        auth::LoginResponse,
        posts::CreatePostRequest,
        posts::UpdatePostRequest,
        posts::PostEnvelope,
        posts::MessageResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "auth", description = "Registration and login"),
        (name = "posts", description = "Blog post creation, retrieval, updates, and deletion"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /login"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api-docs/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/health", "/register", "/login", "/blog", "/blog/{id}"] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
