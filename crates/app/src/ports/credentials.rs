//! Credential port — the bearer token used by the transport layer.

/// Supplies the bearer credential of the signed-in operator.
///
/// `None` means nobody is signed in; stores must refuse to operate rather
/// than send anonymous requests.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl<T: CredentialProvider> CredentialProvider for std::sync::Arc<T> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}
