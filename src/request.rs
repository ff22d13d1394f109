use std::{convert::TryFrom, future::Future, time::Duration};

use http::{header::AUTHORIZATION, Method};
use reqwest::{
    header::HeaderMap, header::HeaderName, header::HeaderValue, Body, Error,
    RequestBuilder as ReqwestRequestBuilder, Response, Url,
};
use serde::Serialize;

use crate::signer::AccessSigner;

/// Builder for an authenticated API request.
///
/// Wraps reqwest's builder while keeping the captured method, URL and body in
/// sync, so the `Authorization` header can be generated over the final
/// parameter set at send time.
pub struct RequestBuilder {
    inner: ReqwestRequestBuilder,
    method: Method,
    url: Url,
    body: String,
    signer: AccessSigner,
}

impl RequestBuilder {
    pub(crate) fn new(
        builder: ReqwestRequestBuilder,
        method: Method,
        url: Url,
        signer: AccessSigner,
    ) -> Self {
        RequestBuilder {
            inner: builder,
            method,
            url,
            body: String::new(),
            signer,
        }
    }

    // ------------------------------------------------------------------------
    // Finish building the request and send it to server with OAuth signature

    /// Constructs the request and sends it to the target URL, returning a
    /// future Response.
    ///
    /// # Errors
    ///
    /// This method fails if there was an error while sending request,
    /// redirect loop was detected or redirect limit was exhausted.
    pub fn send(self) -> impl Future<Output = Result<Response, Error>> {
        self.generate_signature().send()
    }

    /// Generate the OAuth signature and return the underlying reqwest builder
    /// with the `Authorization` header attached.
    pub fn generate_signature(self) -> ReqwestRequestBuilder {
        let RequestBuilder {
            inner,
            method,
            mut url,
            body,
            signer,
        } = self;
        let query = url.query().unwrap_or("").to_string();
        let (is_query, payload) = if query.is_empty() {
            // sign over the form body
            (false, body)
        } else {
            // sign over the query string, against the query-less URL
            url.set_query(None);
            (true, query)
        };
        let signature = signer.generate_signature(method, url, &payload, is_query);
        inner.header(AUTHORIZATION, signature)
    }

    // ------------------------------------------------------------------------
    // Trapped with the wrapper

    /// Modify the query string of the URL, keeping the captured URL in sync
    /// with the one the inner builder will send.
    ///
    /// This method appends and does not overwrite: calling
    /// `.query(&[("foo", "a"), ("foo", "b")])` gives `"foo=a&foo=b"`.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        {
            let mut pairs = self.url.query_pairs_mut();
            let serializer = serde_urlencoded::Serializer::new(&mut pairs);
            let _ = query.serialize(serializer);
        }
        if let Some("") = self.url.query() {
            self.url.set_query(None);
        }
        self.inner = self.inner.query(query);
        self
    }

    /// Send a form body, capturing the urlencoded pairs for the signature.
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form) {
            Ok(body) => {
                self.inner = self.inner.form(form);
                self.body = body;
                self
            }
            Err(_) => self.pass_through(|b| b.form(form)),
        }
    }

    // ------------------------------------------------------------------------
    // Pass-through to inner builder

    fn pass_through<F>(self, f: F) -> Self
    where
        F: FnOnce(ReqwestRequestBuilder) -> ReqwestRequestBuilder,
    {
        RequestBuilder {
            inner: f(self.inner),
            ..self
        }
    }

    /// Add a `Header` to this Request.
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.pass_through(|b| b.header(key, value))
    }

    /// Add a set of Headers to the existing ones on this Request.
    ///
    /// The headers will be merged in to any already set.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.inner = self.inner.headers(headers);
        self
    }

    /// Set a raw request body.
    ///
    /// A raw body is not urlencoded form data, so it does not take part in
    /// the signature.
    pub fn body<T: Into<Body>>(mut self, body: T) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    /// Enables a request timeout.
    ///
    /// The timeout is applied from the when the request starts connecting
    /// until the response body has finished. It affects only this request
    /// and overrides the timeout configured using `ClientBuilder::timeout()`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Sends a multipart/form-data body.
    ///
    /// Note: multipart/form-data is not handled by the OAuth signer.
    #[cfg(feature = "multipart")]
    pub fn multipart(self, multipart: reqwest::multipart::Form) -> Self {
        self.pass_through(|b| b.multipart(multipart))
    }

    /// Attempt to clone the RequestBuilder.
    ///
    /// `None` is returned if the RequestBuilder can not be cloned,
    /// i.e. if the request body is a stream.
    pub fn try_clone(&self) -> Option<Self> {
        match self.inner.try_clone() {
            Some(inner) => Some(RequestBuilder {
                inner,
                method: self.method.clone(),
                url: self.url.clone(),
                body: self.body.clone(),
                signer: self.signer.clone(),
            }),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::header::AUTHORIZATION;

    use crate::service::{MagentoService, PROVIDER_NAME};
    use crate::store::{MemoryTokenStore, TokenStore};
    use crate::token::parse_access_token;
    use crate::Credentials;

    fn service_with_token() -> MagentoService {
        let store = Arc::new(MemoryTokenStore::new());
        let token = parse_access_token("oauth_token=A&oauth_token_secret=S").unwrap();
        store.set(PROVIDER_NAME, token);
        MagentoService::builder()
            .credentials(Credentials::new("key", "secret"))
            .base_uri("http://magento.local")
            .store(store)
            .build()
            .unwrap()
    }

    #[test]
    fn capture_form_body() {
        let request = service_with_token()
            .post("/api/rest/products")
            .unwrap()
            .form(&[("少女", "終末旅行")]);
        assert_eq!(
            request.body,
            "%E5%B0%91%E5%A5%B3=%E7%B5%82%E6%9C%AB%E6%97%85%E8%A1%8C"
        );
    }

    #[test]
    fn capture_get_query() {
        let request = service_with_token()
            .get("/api/rest/products")
            .unwrap()
            .query(&[("limit", "10"), ("page", "2")]);
        assert_eq!(request.url.query(), Some("limit=10&page=2"));
    }

    #[test]
    fn api_request_is_signed_with_access_token() {
        let request = service_with_token()
            .post("/api/rest/products")
            .unwrap()
            .form(&[("oauth_verifier", "V"), ("name", "widget")])
            .generate_signature()
            .build()
            .unwrap();

        let header = request
            .headers()
            .get(AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_token=\"A\""));
        assert!(header.contains("oauth_verifier=\"V\""));
        assert!(header.contains("oauth_signature="));
        assert!(!header.contains("oauth_callback"));
    }

    #[test]
    fn query_only_request_signs_over_query() {
        let request = service_with_token()
            .get("/api/rest/products")
            .unwrap()
            .query(&[("limit", "10")])
            .generate_signature()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://magento.local/api/rest/products?limit=10"
        );
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(header.contains("oauth_signature="));
    }
}
