use std::borrow::Cow;

use http::Method;
use oauth1_request::signature_method::SignatureMethod;
use oauth1_request::signer::Signer as OAuthSigner;
use oauth1_request::{HmacSha1, Options};
use url::Url;

use crate::credentials::{Credentials, SecretsProvider};
use crate::{OAUTH_KEY_PREFIX, OAUTH_VERIFIER_KEY, REALM_KEY};

/// Signer bound to owned consumer credentials and an attached token pair,
/// as carried by the API request builder.
pub type AccessSigner = Signer<'static, Credentials<'static, Cow<'static, str>>, HmacSha1>;

#[derive(Debug, Clone)]
pub struct Signer<'a, TCredentials, TSignatureMethod>
where
    TCredentials: SecretsProvider,
    TSignatureMethod: SignatureMethod + Clone,
{
    credentials: TCredentials,
    parameters: OAuthParameters<'a, TSignatureMethod>,
}

impl<'a, TCredentials, TSignatureMethod> Signer<'a, TCredentials, TSignatureMethod>
where
    TCredentials: SecretsProvider,
    TSignatureMethod: SignatureMethod + Clone,
{
    pub fn new(
        credentials: TCredentials,
        parameters: OAuthParameters<'a, TSignatureMethod>,
    ) -> Self {
        Signer {
            credentials,
            parameters,
        }
    }

    /// Generate the `Authorization` header value for the given request.
    ///
    /// The payload is the urlencoded query (`is_url_query`) or form body; its
    /// pairs take part in the signature base. `oauth_`-prefixed payload keys
    /// are not signed as ordinary parameters; of these, an `oauth_verifier` is
    /// promoted into the OAuth parameter set so that a verifier submitted in
    /// the request body is covered by the signature, as the provider requires
    /// on the redeem leg.
    pub fn generate_signature(
        self,
        method: Method,
        url: Url,
        payload: &str,
        is_url_query: bool,
    ) -> String {
        let (consumer_key, consumer_secret) = self.credentials.get_consumer_key_pair();
        let (token, token_secret) = self.credentials.get_token_option_pair();

        // destructure query and sort by alphabetical order
        let parsed_payload: Vec<(Cow<str>, Cow<str>)> =
            url::form_urlencoded::parse(payload.as_bytes())
                .into_iter()
                .collect();

        let payload_verifier = parsed_payload
            .iter()
            .find(|(key, _)| key == OAUTH_VERIFIER_KEY)
            .map(|(_, value)| value.clone());

        // build oauth option
        let options = self
            .parameters
            .build_options(token, payload_verifier.as_deref());

        let oauth_marker = vec![(Cow::from(OAUTH_KEY_PREFIX), Cow::from(""))];
        let mut sorted_query = [parsed_payload, oauth_marker].concat();
        sorted_query.sort();

        // divide key-value items by the element has "oauth_" key
        let mut divided = sorted_query
            .splitn(2, |(k, _)| k == &OAUTH_KEY_PREFIX)
            .into_iter();
        let query_before_oauth = divided.next().unwrap_or_default();
        let query_after_oauth = divided.next().unwrap_or_default();

        // generate signature
        // Step 0. instantiate sign generator
        let sig_method = self.parameters.signature_method.clone();
        let mut signer = if is_url_query {
            OAuthSigner::with_signature_method(
                sig_method,
                method.as_str(),
                url,
                consumer_secret,
                token_secret,
            )
        } else {
            OAuthSigner::form_with_signature_method(
                sig_method,
                method.as_str(),
                url,
                consumer_secret,
                token_secret,
            )
        };

        // Step 1. key [a ~ oauth_)
        for (key, value) in query_before_oauth {
            if !key.starts_with(OAUTH_KEY_PREFIX) {
                // not an oauth_* parameter
                signer.parameter(key, value);
            }
        }
        // Step 2. add oauth_* parameters
        let mut signer = signer.oauth_parameters(consumer_key, &options);
        // Step 3. key (oauth_ ~ z]
        for (key, value) in query_after_oauth {
            if !key.starts_with(OAUTH_KEY_PREFIX) {
                // not an oauth_* parameter
                signer.parameter(key, value);
            }
        }

        // signature is generated.
        let sign = signer.finish().authorization;

        if let Some(realm) = self.parameters.realm {
            // OAuth oauth_...,realm="realm"
            format!("{},{}=\"{}\"", sign, REALM_KEY, realm.as_ref())
        } else {
            // OAuth oauth_...
            sign
        }
    }
}

#[derive(Debug, Clone)]
pub struct OAuthParameters<'a, TSignatureMethod>
where
    TSignatureMethod: SignatureMethod + Clone,
{
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    signature_method: TSignatureMethod,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl Default for OAuthParameters<'static, HmacSha1> {
    fn default() -> Self {
        OAuthParameters {
            callback: None,
            nonce: None,
            realm: None,
            signature_method: HmacSha1,
            timestamp: None,
            verifier: None,
            version: false,
        }
    }
}

impl<'a> OAuthParameters<'a, HmacSha1> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value; only meaningful on the request-token leg
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_realm value
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set the oauth_version value (boolean)
    ///
    /// # Note
    /// When the version has value `true`, oauth_version will be set with "1.0".
    /// Otherwise, oauth_version will not be included in your request.
    /// In oauth1, oauth_version value must be "1.0" or not specified.
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }
}

impl<'a, T> OAuthParameters<'a, T>
where
    T: SignatureMethod + Clone,
{
    pub fn signature_method<TSignatureMethod>(
        self,
        signature_method: TSignatureMethod,
    ) -> OAuthParameters<'a, TSignatureMethod>
    where
        TSignatureMethod: SignatureMethod + Clone,
    {
        OAuthParameters {
            signature_method,
            callback: None,
            nonce: None,
            realm: None,
            timestamp: None,
            verifier: None,
            version: false,
        }
    }
}

impl<'a, T> OAuthParameters<'a, T>
where
    T: SignatureMethod + Clone,
{
    fn build_options<'o>(
        &'o self,
        token: Option<&'o str>,
        payload_verifier: Option<&'o str>,
    ) -> Options<'o> {
        let mut opt = Options::new();

        // NOTE: items must be added by alphabetical order

        if let Some(ref callback) = self.callback {
            opt.callback(callback.as_ref());
        }
        if let Some(ref nonce) = self.nonce {
            opt.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            opt.timestamp(timestamp);
        }
        if let Some(token) = token {
            opt.token(token);
        }
        // a verifier carried in the signed payload wins over a configured one
        if let Some(verifier) = payload_verifier.or_else(|| self.verifier.as_deref()) {
            opt.verifier(verifier);
        }
        opt.version(self.version);

        opt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;

    fn extract_signature(auth_header: &str) -> String {
        let content = auth_header.strip_prefix("OAuth ").unwrap();
        let mapped_header = content
            .split(',')
            .map(|item| item.splitn(2, '=').collect::<Vec<&str>>())
            .filter(|v| v.len() == 2)
            .map(|v| (v[0], v[1]))
            .collect::<Vec<(&str, &str)>>();
        let sig_content = mapped_header.iter().find(|(k, _)| k == &"oauth_signature");
        percent_encoding::percent_decode_str(sig_content.unwrap().1)
            .decode_utf8_lossy()
            .trim_matches('"')
            .to_string()
    }

    #[test]
    fn sign_request_token_leg() {
        // https://tools.ietf.org/html/rfc5849
        let endpoint = Url::parse("https://photos.example.net/initiate").unwrap();
        let credentials = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
        let parameters = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64)
            .callback("http://printer.example.com/ready")
            .realm("photos");

        let sign = Signer::new(credentials, parameters).generate_signature(
            Method::POST,
            endpoint,
            "",
            false,
        );
        assert_eq!(extract_signature(&sign), "74KNZJeDHnMBp0EMJ9ZHt/XKycU=");
    }

    #[test]
    fn sign_get_query() {
        // https://tools.ietf.org/html/rfc5849
        let endpoint = Url::parse("http://photos.example.net/photos").unwrap();
        let credentials = Credentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
            .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let parameters = OAuthParameters::new()
            .nonce("chapoH")
            .timestamp(137_131_202u64)
            .realm("Photos");

        let sign = Signer::new(credentials, parameters).generate_signature(
            Method::GET,
            endpoint,
            "file=vacation.jpg&size=original",
            true,
        );
        assert_eq!(extract_signature(&sign), "MdpQcU8iPSUjWoN/UDMsK2sui9I=");
    }

    #[test]
    fn payload_verifier_is_promoted() {
        let endpoint = Url::parse("http://magento.local/oauth/token").unwrap();
        let credentials = Credentials::new("key", "secret").token("token", "token_secret");

        let sign = Signer::new(credentials, OAuthParameters::new()).generate_signature(
            Method::POST,
            endpoint,
            "oauth_verifier=odiseo&qty=2",
            false,
        );
        assert!(sign.starts_with("OAuth "));
        assert!(sign.contains("oauth_verifier=\"odiseo\""));
        assert!(sign.contains("oauth_token=\"token\""));
        assert!(sign.contains("oauth_signature="));
        assert!(!sign.contains("oauth_callback"));
    }

    #[test]
    fn header_has_no_callback_unless_configured() {
        let endpoint = Url::parse("http://magento.local/api/rest/products").unwrap();
        let credentials = Credentials::new("key", "secret").token("token", "token_secret");

        let sign = Signer::new(credentials, OAuthParameters::new()).generate_signature(
            Method::GET,
            endpoint,
            "",
            false,
        );
        assert!(!sign.contains("oauth_callback"));
        assert!(!sign.contains("oauth_verifier"));
    }
}
