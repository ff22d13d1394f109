use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use oauth1_request::HmacSha1;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::credentials::{Credentials, SecretsProvider};
use crate::endpoints::{AuthorizationScope, Endpoints};
use crate::error::{ConfigurationError, Error, Result};
use crate::request::RequestBuilder;
use crate::signer::{AccessSigner, OAuthParameters, Signer};
use crate::store::{MemoryTokenStore, TokenStore};
use crate::token::{parse_access_token, parse_request_token, Token};
use crate::{OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY};

/// Name under which tokens are filed in the [`TokenStore`].
pub const PROVIDER_NAME: &str = "magento";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Magento's three-legged OAuth 1.0a flow against one store.
///
/// The authorization scope is fixed per instance; build a second service for
/// the other scope. A service holds no mutable state of its own and can be
/// shared freely; tokens between legs live in the [`TokenStore`].
#[derive(Clone)]
pub struct MagentoService {
    credentials: Credentials<'static, ()>,
    client: Client,
    store: Arc<dyn TokenStore>,
    endpoints: Endpoints,
}

impl MagentoService {
    /// Service against `base_uri` with the default (admin) authorization
    /// scope, a default HTTP client and an in-memory token store.
    pub fn new(
        credentials: Credentials<'static, ()>,
        base_uri: &str,
    ) -> std::result::Result<Self, ConfigurationError> {
        Self::builder().credentials(credentials).base_uri(base_uri).build()
    }

    pub fn builder() -> MagentoServiceBuilder {
        MagentoServiceBuilder::new()
    }

    pub fn authorization_scope(&self) -> AuthorizationScope {
        self.endpoints.scope()
    }

    pub fn request_token_endpoint(&self) -> Url {
        self.endpoints.request_token()
    }

    pub fn authorization_endpoint(&self) -> Url {
        self.endpoints.authorization()
    }

    pub fn access_token_endpoint(&self) -> Url {
        self.endpoints.access_token()
    }

    /// Leg 1: obtain an unauthorized request token.
    ///
    /// The request is signed with `oauth_callback` set to the configured
    /// callback URL, or `oob` when none is configured. The returned token is
    /// filed in the store so the redeem leg can pick up its secret.
    pub async fn request_request_token(&self) -> Result<Token> {
        let callback = self
            .credentials
            .get_callback_url()
            .unwrap_or("oob")
            .to_owned();
        let parameters = OAuthParameters::new().callback(callback);
        let response = self
            .signed(
                Method::POST,
                self.request_token_endpoint(),
                parameters,
                &self.credentials,
                "",
            )
            .send()
            .await?;
        let body = response.text().await?;
        let token = parse_request_token(&body)?;
        self.store.set(PROVIDER_NAME, token.clone());
        debug!(provider = PROVIDER_NAME, "request token acquired");
        Ok(token)
    }

    /// Leg 2: the page to send the user to, carrying the request token.
    pub fn authorization_url(&self, token: &Token) -> Url {
        let mut url = self.authorization_endpoint();
        url.query_pairs_mut()
            .append_pair(OAUTH_TOKEN_KEY, token.request_token());
        url
    }

    /// Leg 3: exchange the authorized request token and verifier for the
    /// access token.
    ///
    /// `oauth_token` is the token echoed back to the callback; its secret is
    /// looked up in the store, where leg 1 filed it. The verifier travels in
    /// the form body and in the signed OAuth parameter set.
    pub async fn request_access_token(&self, oauth_token: &str, verifier: &str) -> Result<Token> {
        let request_token = self
            .store
            .get(PROVIDER_NAME)
            .ok_or(Error::TokenNotStored(PROVIDER_NAME))?;
        let credentials = self.credentials.clone().token(
            oauth_token.to_owned(),
            request_token.request_token_secret().to_owned(),
        );
        let parameters = OAuthParameters::new().verifier(verifier.to_owned());
        let payload = serde_urlencoded::to_string(&[(OAUTH_VERIFIER_KEY, verifier)])?;
        let response = self
            .signed(
                Method::POST,
                self.access_token_endpoint(),
                parameters,
                &credentials,
                &payload,
            )
            .send()
            .await?;
        let body = response.text().await?;
        let token = parse_access_token(&body)?;
        self.store.set(PROVIDER_NAME, token.clone());
        debug!(provider = PROVIDER_NAME, "access token acquired");
        Ok(token)
    }

    /// Build the `Authorization` header for an authenticated API call.
    ///
    /// Deviations from the token legs: `oauth_callback` is never included,
    /// an `oauth_verifier` among the body parameters joins the signed OAuth
    /// parameter set, and `oauth_token` carries the access token. The
    /// signature covers the merged parameter set.
    pub fn build_authorization_header(
        &self,
        method: Method,
        url: &Url,
        token: &Token,
        body_params: &[(&str, &str)],
    ) -> Result<String> {
        let payload = serde_urlencoded::to_string(body_params)?;
        Ok(self
            .api_signer(token)
            .generate_signature(method, url.clone(), &payload, false))
    }

    /// Convenience method to make a `GET` request to an API path.
    pub fn get(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::GET, path)
    }

    /// Convenience method to make a `POST` request to an API path.
    pub fn post(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::POST, path)
    }

    /// Convenience method to make a `PUT` request to an API path.
    pub fn put(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::PUT, path)
    }

    /// Convenience method to make a `DELETE` request to an API path.
    pub fn delete(&self, path: &str) -> Result<RequestBuilder> {
        self.request(Method::DELETE, path)
    }

    /// Start building an authenticated request to an API path, resolved
    /// against the base URI. Signing uses the stored access token; the call
    /// fails when no token has been stored yet.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self
            .store
            .get(PROVIDER_NAME)
            .ok_or(Error::TokenNotStored(PROVIDER_NAME))?;
        let url = self
            .endpoints
            .base()
            .join(path)
            .map_err(Error::InvalidRequestPath)?;
        Ok(RequestBuilder::new(
            self.client.request(method.clone(), url.clone()),
            method,
            url,
            self.api_signer(&token),
        ))
    }

    fn api_signer(&self, token: &Token) -> AccessSigner {
        // no oauth_callback here: it is only meaningful on the request-token leg
        let credentials = self.credentials.clone().token(
            token.access_token().to_owned(),
            token.access_token_secret().to_owned(),
        );
        Signer::new(credentials, OAuthParameters::new())
    }

    fn signed<C>(
        &self,
        method: Method,
        url: Url,
        parameters: OAuthParameters<'static, HmacSha1>,
        credentials: &C,
        payload: &str,
    ) -> reqwest::RequestBuilder
    where
        C: SecretsProvider + Clone,
    {
        let header = Signer::new(credentials.clone(), parameters).generate_signature(
            method.clone(),
            url.clone(),
            payload,
            false,
        );
        let mut request = self.client.request(method, url).header(AUTHORIZATION, header);
        if !payload.is_empty() {
            request = request
                .header(CONTENT_TYPE, FORM_URLENCODED)
                .body(payload.to_owned());
        }
        request
    }
}

#[derive(Default)]
pub struct MagentoServiceBuilder {
    credentials: Option<Credentials<'static, ()>>,
    base_uri: Option<String>,
    scope: AuthorizationScope,
    client: Option<Client>,
    store: Option<Arc<dyn TokenStore>>,
}

impl MagentoServiceBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn credentials(mut self, credentials: Credentials<'static, ()>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The store's base URI, e.g. `http://magento.local`. Required: the
    /// provider has no global endpoint, every store hosts its own.
    pub fn base_uri<T: Into<String>>(mut self, base_uri: T) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn authorization_scope(mut self, scope: AuthorizationScope) -> Self {
        self.scope = scope;
        self
    }

    /// Use a preconfigured HTTP client instead of the default one.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Attach an external token store, e.g. one backed by the user session.
    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> std::result::Result<MagentoService, ConfigurationError> {
        let credentials = self
            .credentials
            .ok_or(ConfigurationError::MissingCredentials)?;
        let base_uri = self.base_uri.ok_or(ConfigurationError::MissingBaseUri)?;
        let endpoints = Endpoints::parse(&base_uri, self.scope)?;
        Ok(MagentoService {
            credentials,
            client: self.client.unwrap_or_default(),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            endpoints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MagentoService {
        MagentoService::new(Credentials::new("key", "secret"), "http://magento.local").unwrap()
    }

    #[test]
    fn builder_requires_base_uri() {
        let built = MagentoService::builder()
            .credentials(Credentials::new("key", "secret"))
            .build();
        assert!(matches!(built, Err(ConfigurationError::MissingBaseUri)));
    }

    #[test]
    fn builder_requires_credentials() {
        let built = MagentoService::builder()
            .base_uri("http://magento.local")
            .build();
        assert!(matches!(built, Err(ConfigurationError::MissingCredentials)));
    }

    #[test]
    fn builder_rejects_malformed_base_uri() {
        let built = MagentoService::builder()
            .credentials(Credentials::new("key", "secret"))
            .base_uri("magento.local")
            .build();
        assert!(matches!(built, Err(ConfigurationError::InvalidBaseUri(_))));
    }

    #[test]
    fn endpoints_resolve_against_base() {
        let service = service();
        assert_eq!(
            service.request_token_endpoint().as_str(),
            "http://magento.local/oauth/initiate"
        );
        assert_eq!(
            service.access_token_endpoint().as_str(),
            "http://magento.local/oauth/token"
        );
        // admin scope is the default
        assert_eq!(
            service.authorization_endpoint().as_str(),
            "http://magento.local/admin/oAuth_authorize"
        );
    }

    #[test]
    fn customer_scope_switches_authorization_endpoint_only() {
        let service = MagentoService::builder()
            .credentials(Credentials::new("key", "secret"))
            .base_uri("http://magento.local")
            .authorization_scope(AuthorizationScope::Customer)
            .build()
            .unwrap();
        assert_eq!(
            service.authorization_endpoint().as_str(),
            "http://magento.local/oauth/authorize"
        );
        assert_eq!(
            service.request_token_endpoint().as_str(),
            "http://magento.local/oauth/initiate"
        );
        assert_eq!(
            service.access_token_endpoint().as_str(),
            "http://magento.local/oauth/token"
        );
    }

    #[test]
    fn authorization_url_carries_request_token() {
        let token =
            parse_request_token("oauth_token=R&oauth_token_secret=S&oauth_callback_confirmed=true")
                .unwrap();
        assert_eq!(
            service().authorization_url(&token).as_str(),
            "http://magento.local/admin/oAuth_authorize?oauth_token=R"
        );
    }

    #[test]
    fn header_signs_body_verifier_and_drops_callback() {
        let service = MagentoService::new(
            Credentials::new("key", "secret").callback("http://app.example/callback"),
            "http://magento.local",
        )
        .unwrap();
        let token = parse_access_token("oauth_token=A&oauth_token_secret=S").unwrap();
        let url = Url::parse("http://magento.local/api/rest/customers").unwrap();

        let header = service
            .build_authorization_header(
                Method::POST,
                &url,
                &token,
                &[("oauth_verifier", "V"), ("page", "1")],
            )
            .unwrap();
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_verifier=\"V\""));
        assert!(header.contains("oauth_token=\"A\""));
        assert!(header.contains("oauth_signature="));
        // never signs the callback into API requests, even when configured
        assert!(!header.contains("oauth_callback"));
    }

    #[test]
    fn api_request_requires_stored_token() {
        let request = service().get("/api/rest/customers");
        assert!(matches!(request, Err(Error::TokenNotStored(PROVIDER_NAME))));
    }
}
