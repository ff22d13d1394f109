use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TokenResponseError;
use crate::{ERROR_KEY, OAUTH_CALLBACK_CONFIRMED_KEY, OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY};

/// End of life of a token. Magento issues tokens that never expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    Never,
    Unknown,
}

impl Default for Expiry {
    fn default() -> Self {
        Expiry::Unknown
    }
}

/// A token of the three-legged flow.
///
/// The provider answers both token legs with the same response shape, so the
/// request and access pairs start out identical; the request pair keeps the
/// leg-1 values around for the redeem step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    request_token: String,
    request_token_secret: String,
    access_token: String,
    access_token_secret: String,
    expiry: Expiry,
    extra: HashMap<String, String>,
}

impl Token {
    pub fn request_token(&self) -> &str {
        &self.request_token
    }

    pub fn request_token_secret(&self) -> &str {
        &self.request_token_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    /// Provider-returned parameters beyond the token pair.
    pub fn extra(&self) -> &HashMap<String, String> {
        &self.extra
    }
}

/// Parse the leg-1 response body.
///
/// On top of the access-token validation, Magento requires the request-token
/// leg to confirm the callback: `oauth_callback_confirmed` must be present and
/// equal to the literal `"true"`. Both legs share one response shape, so a
/// confirmed body is handed on to [`parse_access_token`].
pub fn parse_request_token(body: &str) -> Result<Token, TokenResponseError> {
    let fields = validated_fields(body)?;
    match fields.get(OAUTH_CALLBACK_CONFIRMED_KEY) {
        Some(confirmed) if confirmed == "true" => parse_access_token(body),
        _ => Err(TokenResponseError::CallbackNotConfirmed(body.to_string())),
    }
}

/// Parse the leg-3 response body.
pub fn parse_access_token(body: &str) -> Result<Token, TokenResponseError> {
    let mut fields = validated_fields(body)?;
    let token = fields.remove(OAUTH_TOKEN_KEY).unwrap_or_default();
    let token_secret = fields.remove(OAUTH_TOKEN_SECRET_KEY).unwrap_or_default();
    Ok(Token {
        request_token: token.clone(),
        request_token_secret: token_secret.clone(),
        access_token: token,
        access_token_secret: token_secret,
        expiry: Expiry::Never,
        extra: fields,
    })
}

fn validated_fields(body: &str) -> Result<HashMap<String, String>, TokenResponseError> {
    if body.trim().is_empty() {
        return Err(TokenResponseError::EmptyResponse);
    }
    let fields = destructure(body);
    if let Some(error) = fields.get(ERROR_KEY) {
        return Err(TokenResponseError::Provider(error.clone()));
    }
    if !fields.contains_key(OAUTH_TOKEN_KEY) {
        return Err(TokenResponseError::TokenKeyNotFound(
            OAUTH_TOKEN_KEY,
            body.to_string(),
        ));
    }
    if !fields.contains_key(OAUTH_TOKEN_SECRET_KEY) {
        return Err(TokenResponseError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            body.to_string(),
        ));
    }
    Ok(fields)
}

fn destructure(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}
