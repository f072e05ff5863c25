//! Credential sources for the HTTP room store.

use roomcfg_app::ports::CredentialProvider;

/// A token fixed at start-up, typically read from config or the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Blank tokens count as absent.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|token| !token.trim().is_empty()))
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
