use std::borrow::Cow;

pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    fn get_token_option_pair<'a>(&'a self) -> (Option<&'a str>, Option<&'a str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or_else(|| (None, None))
    }

    fn get_callback_url<'a>(&'a self) -> Option<&'a str> {
        None
    }
}

/// Consumer registration plus, optionally, the token pair acquired during the
/// authorization flow. The token state is tracked in the type: `Credentials<()>`
/// signs without a token (leg 1), `Credentials<Cow<str>>` signs with one.
#[derive(Debug, Clone)]
pub struct Credentials<'a, T> {
    token: T,
    token_secret: T,
    consumer_key: Cow<'a, str>,
    consumer_secret: Cow<'a, str>,
    callback_url: Option<Cow<'a, str>>,
}

impl<'a> Credentials<'a, ()> {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Credentials {
            token: (),
            token_secret: (),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_url: None,
        }
    }

    /// Set the callback URL the provider redirects to after authorization.
    pub fn callback<T>(self, callback_url: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        Credentials {
            callback_url: Some(callback_url.into()),
            ..self
        }
    }

    pub fn token<TKey, TSecret>(
        self,
        token: TKey,
        token_secret: TSecret,
    ) -> Credentials<'a, Cow<'a, str>>
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Credentials {
            token: token.into(),
            token_secret: token_secret.into(),
            consumer_key: self.consumer_key,
            consumer_secret: self.consumer_secret,
            callback_url: self.callback_url,
        }
    }
}

impl SecretsProvider for Credentials<'_, ()> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        None
    }

    fn get_callback_url<'a>(&'a self) -> Option<&'a str> {
        self.callback_url.as_deref()
    }
}

impl SecretsProvider for Credentials<'_, Cow<'_, str>> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        Some((&self.token, &self.token_secret))
    }

    fn get_callback_url<'a>(&'a self) -> Option<&'a str> {
        self.callback_url.as_deref()
    }
}
