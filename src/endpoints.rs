use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::ConfigurationError;

/// Leg-1 path: obtain the unauthorized request token.
pub const REQUEST_TOKEN_PATH: &str = "/oauth/initiate";
/// Leg-3 path: exchange the verified request token for the access token.
pub const ACCESS_TOKEN_PATH: &str = "/oauth/token";
/// Leg-2 path for storefront customers.
pub const AUTHORIZE_CUSTOMER_PATH: &str = "/oauth/authorize";
/// Leg-2 path for admin users.
pub const AUTHORIZE_ADMIN_PATH: &str = "/admin/oAuth_authorize";

/// Which authorization page the user is sent to. Magento exposes one for
/// storefront customers and one for admin users; admin is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationScope {
    Customer,
    Admin,
}

impl AuthorizationScope {
    pub fn path(self) -> &'static str {
        match self {
            AuthorizationScope::Customer => AUTHORIZE_CUSTOMER_PATH,
            AuthorizationScope::Admin => AUTHORIZE_ADMIN_PATH,
        }
    }
}

impl Default for AuthorizationScope {
    fn default() -> Self {
        AuthorizationScope::Admin
    }
}

impl FromStr for AuthorizationScope {
    type Err = ConfigurationError;

    fn from_str(scope: &str) -> Result<Self, Self::Err> {
        match scope {
            "customer" => Ok(AuthorizationScope::Customer),
            "admin" => Ok(AuthorizationScope::Admin),
            other => Err(ConfigurationError::InvalidAuthorizationScope(
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for AuthorizationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationScope::Customer => f.write_str("customer"),
            AuthorizationScope::Admin => f.write_str("admin"),
        }
    }
}

/// The three provider endpoints resolved against a store's base URI.
///
/// The scope is fixed at construction; resolving for the other scope means
/// building another instance.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    scope: AuthorizationScope,
}

impl Endpoints {
    pub fn new(base: Url, scope: AuthorizationScope) -> Self {
        Endpoints { base, scope }
    }

    pub fn parse(base: &str, scope: AuthorizationScope) -> Result<Self, ConfigurationError> {
        Ok(Endpoints::new(Url::parse(base)?, scope))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn scope(&self) -> AuthorizationScope {
        self.scope
    }

    pub fn request_token(&self) -> Url {
        self.at(REQUEST_TOKEN_PATH)
    }

    pub fn authorization(&self) -> Url {
        self.at(self.scope.path())
    }

    pub fn access_token(&self) -> Url {
        self.at(ACCESS_TOKEN_PATH)
    }

    fn at(&self, path: &str) -> Url {
        let mut uri = self.base.clone();
        uri.set_path(path);
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(scope: AuthorizationScope) -> Endpoints {
        Endpoints::parse("http://magento.local", scope).unwrap()
    }

    #[test]
    fn default_scope_is_admin() {
        assert_eq!(AuthorizationScope::default(), AuthorizationScope::Admin);
    }

    #[test]
    fn token_endpoints_ignore_scope() {
        for scope in &[AuthorizationScope::Customer, AuthorizationScope::Admin] {
            let endpoints = endpoints(*scope);
            assert_eq!(
                endpoints.request_token().as_str(),
                "http://magento.local/oauth/initiate"
            );
            assert_eq!(
                endpoints.access_token().as_str(),
                "http://magento.local/oauth/token"
            );
        }
    }

    #[test]
    fn authorization_endpoint_follows_scope() {
        assert_eq!(
            endpoints(AuthorizationScope::Admin).authorization().as_str(),
            "http://magento.local/admin/oAuth_authorize"
        );
        assert_eq!(
            endpoints(AuthorizationScope::Customer)
                .authorization()
                .as_str(),
            "http://magento.local/oauth/authorize"
        );
    }

    #[test]
    fn scope_parses_from_str() {
        assert_eq!(
            "customer".parse::<AuthorizationScope>().unwrap(),
            AuthorizationScope::Customer
        );
        assert_eq!(
            "admin".parse::<AuthorizationScope>().unwrap(),
            AuthorizationScope::Admin
        );
        let parsed = "storefront".parse::<AuthorizationScope>();
        assert!(matches!(
            parsed,
            Err(ConfigurationError::InvalidAuthorizationScope(scope)) if scope == "storefront"
        ));
    }

    #[test]
    fn relative_base_is_rejected() {
        let parsed = Endpoints::parse("magento.local", AuthorizationScope::Admin);
        assert!(matches!(
            parsed,
            Err(ConfigurationError::InvalidBaseUri(_))
        ));
    }
}
