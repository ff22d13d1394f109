//!
//! magento-oauth1: Magento ♡ reqwest ♡ oauth1-request.
//!
//! # Overview
//!
//! This library drives the three-legged OAuth 1.0a authorization flow of a
//! Magento store on top of [reqwest](https://crates.io/crates/reqwest), with
//! signatures computed by the
//! [oauth1-request](https://crates.io/crates/oauth1-request) crate.
//!
//! Magento differs from the textbook flow in a few places, all handled here:
//! every store hosts its own endpoints under a per-store base URI, the
//! request-token leg must answer `oauth_callback_confirmed=true` to be valid,
//! there are separate authorization pages for admin users and storefront
//! customers, and API calls are signed without `oauth_callback` while an
//! `oauth_verifier` submitted in the request body takes part in the signature.
//!
//! # How to use
//!
//! ## Acquiring an access token
//!
//! ```no_run
//! use std::io;
//!
//! use magento_oauth1::{Credentials, MagentoService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // prepare consumer credentials registered with the store
//! let credentials = Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
//!     .callback("http://app.example/callback");
//!
//! let service = MagentoService::builder()
//!     .credentials(credentials)
//!     .base_uri("http://magento.local")
//!     .build()?;
//!
//! // leg 1: acquire request token & token secret
//! let token = service.request_request_token().await?;
//!
//! // leg 2: let the user authorize the token
//! println!("please access to: {}", service.authorization_url(&token));
//!
//! println!("input verifier: ");
//! let mut user_input = String::new();
//! io::stdin().read_line(&mut user_input)?;
//! let verifier = user_input.trim();
//!
//! // leg 3: redeem the verifier for the access token
//! let token = service
//!     .request_access_token(token.request_token(), verifier)
//!     .await?;
//! println!(
//!     "your token and secret is: \n token: {}\n secret: {}",
//!     token.access_token(),
//!     token.access_token_secret()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Calling the API with the stored token
//!
//! ```no_run
//! use magento_oauth1::{Credentials, MagentoService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MagentoService::builder()
//!     .credentials(Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]"))
//!     .base_uri("http://magento.local")
//!     .build()?;
//! # // a completed flow has filed the access token in the service's store
//! let customers = service
//!     .get("/api/rest/customers")?
//!     .header("Accept", "*/*")
//!     .send()
//!     .await?
//!     .text()
//!     .await?;
//! println!("{}", customers);
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing the authorization scope
//!
//! ```
//! use magento_oauth1::{AuthorizationScope, Credentials, MagentoService};
//!
//! let service = MagentoService::builder()
//!     .credentials(Credentials::new("key", "secret"))
//!     .base_uri("http://magento.local")
//!     .authorization_scope(AuthorizationScope::Customer)
//!     .build()?;
//! assert_eq!(service.authorization_endpoint().path(), "/oauth/authorize");
//! # Ok::<(), magento_oauth1::ConfigurationError>(())
//! ```
mod credentials;
mod endpoints;
mod error;
mod request;
mod service;
mod signer;
mod store;
mod token;
mod token_reader;
#[cfg(feature = "blocking")]
pub mod token_reader_blocking;

// exposed to external program
pub use credentials::{Credentials, SecretsProvider};
pub use endpoints::{
    AuthorizationScope, Endpoints, ACCESS_TOKEN_PATH, AUTHORIZE_ADMIN_PATH,
    AUTHORIZE_CUSTOMER_PATH, REQUEST_TOKEN_PATH,
};
pub use error::{ConfigurationError, Error, Result, TokenResponseError};
pub use request::RequestBuilder;
pub use service::{MagentoService, MagentoServiceBuilder, PROVIDER_NAME};
pub use signer::{AccessSigner, OAuthParameters, Signer};
pub use store::{MemoryTokenStore, TokenStore};
pub use token::{parse_access_token, parse_request_token, Expiry, Token};
pub use token_reader::{TokenReader, TokenReaderFuture};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
pub(crate) const OAUTH_CALLBACK_CONFIRMED_KEY: &str = "oauth_callback_confirmed";
pub(crate) const ERROR_KEY: &str = "error";
