use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("service configuration invalid : {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("token acquisition failed : {0}")]
    TokenResponse(#[from] TokenResponseError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("request body could not be urlencoded : {0}")]
    BodyEncode(#[from] serde_urlencoded::ser::Error),
    #[error("request path is invalid : {0}")]
    InvalidRequestPath(url::ParseError),
    #[error("no token stored for provider {0}")]
    TokenNotStored(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("consumer credentials must be set")]
    MissingCredentials,
    #[error("base URI must be set")]
    MissingBaseUri,
    #[error("base URI must be absolute : {0}")]
    InvalidBaseUri(#[from] url::ParseError),
    #[error("authorization scope is invalid : {0}")]
    InvalidAuthorizationScope(String),
}

#[derive(Error, Debug, Clone)]
pub enum TokenResponseError {
    #[error("response body is empty")]
    EmptyResponse,
    #[error("error in retrieving token : \"{0}\"")]
    Provider(String),
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("oauth_callback_confirmed is missing or not \"true\" in {0}")]
    CallbackNotConfirmed(String),
}
