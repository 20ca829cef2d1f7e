use crate::dao::LinkStore;
use crate::token::TokenVerifier;
use std::sync::Arc;

/// Process-wide collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LinkStore>,
    pub tokens: Arc<TokenVerifier>,
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn LinkStore>, tokens: TokenVerifier, public_base_url: &str) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            public_base_url: public_base_url.trim_end_matches('/').into(),
        }
    }
}
