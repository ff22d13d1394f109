use std::collections::HashMap;
use std::sync::RwLock;

use crate::token::Token;

/// Keeps tokens between the legs of the authorization flow, keyed by provider
/// name. The request token stored during leg 1 supplies the secret needed to
/// redeem the verifier in leg 3.
pub trait TokenStore: Send + Sync {
    fn get(&self, provider: &str) -> Option<Token>;

    fn set(&self, provider: &str, token: Token);

    fn clear(&self, provider: &str);
}

/// Process-local store, the default when no external storage is attached.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, provider: &str) -> Option<Token> {
        self.tokens
            .read()
            .ok()
            .and_then(|tokens| tokens.get(provider).cloned())
    }

    fn set(&self, provider: &str, token: Token) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(provider.to_string(), token);
        }
    }

    fn clear(&self, provider: &str) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.remove(provider);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_access_token;

    #[test]
    fn round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.get("magento").is_none());

        let token = parse_access_token("oauth_token=A&oauth_token_secret=B").unwrap();
        store.set("magento", token);
        let stored = store.get("magento").unwrap();
        assert_eq!(stored.access_token(), "A");
        assert_eq!(stored.access_token_secret(), "B");

        store.clear("magento");
        assert!(store.get("magento").is_none());
    }

    #[test]
    fn providers_are_isolated() {
        let store = MemoryTokenStore::new();
        let token = parse_access_token("oauth_token=A&oauth_token_secret=B").unwrap();
        store.set("magento", token);
        assert!(store.get("other").is_none());
    }
}
