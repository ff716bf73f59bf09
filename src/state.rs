//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, UrlService};
use crate::domain::repositories::{UrlRepository, UserRepository};
use crate::utils::code_generator::CodeGenerator;

/// URL service over a type-erased store and generator.
pub type DynUrlService = UrlService<dyn UrlRepository, dyn CodeGenerator>;

/// Auth service over a type-erased user store.
pub type DynAuthService = AuthService<dyn UserRepository>;

/// Services shared by all requests.
///
/// Built once at startup by [`crate::server::run`] (or by the test helpers)
/// and cloned cheaply into each request.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<DynUrlService>,
    pub auth_service: Arc<DynAuthService>,
}

impl AppState {
    /// Wires services over the given repositories and code generator.
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        user_repository: Arc<dyn UserRepository>,
        generator: Arc<dyn CodeGenerator>,
        base_url: &str,
        jwt_secret: &str,
        token_ttl_seconds: u64,
    ) -> Self {
        Self {
            url_service: Arc::new(UrlService::new(url_repository, generator, base_url)),
            auth_service: Arc::new(AuthService::new(
                user_repository,
                jwt_secret,
                token_ttl_seconds,
            )),
        }
    }
}
