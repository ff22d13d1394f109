use std::future::Future;

use async_trait::async_trait;
use reqwest::Response;

use crate::token::{self, Token};
use crate::{Error, Result};

/// Adds token parsing for the two token legs to `reqwest::Response`.
///
/// `parse_request_token` applies the request-token validation (including the
/// callback-confirmation requirement), `parse_access_token` the plain one.
// this trait is sealed
#[async_trait(?Send)]
pub trait TokenReader: private::Sealed {
    async fn parse_request_token(self) -> Result<Token>;

    async fn parse_access_token(self) -> Result<Token>;
}

#[async_trait(?Send)]
impl TokenReader for Response {
    async fn parse_request_token(self) -> Result<Token> {
        let text = self.text().await?;
        Ok(token::parse_request_token(&text)?)
    }

    async fn parse_access_token(self) -> Result<Token> {
        let text = self.text().await?;
        Ok(token::parse_access_token(&text)?)
    }
}

/// Same parsing, chainable directly off a future of `reqwest::Response`.
// this trait is also sealed
#[async_trait(?Send)]
pub trait TokenReaderFuture: private::SealedWrapper {
    async fn parse_request_token(self) -> Result<Token>;

    async fn parse_access_token(self) -> Result<Token>;
}

#[async_trait(?Send)]
impl<T, E> TokenReaderFuture for T
where
    T: Future<Output = std::result::Result<Response, E>>,
    E: Into<Error> + 'static,
{
    async fn parse_request_token(self) -> Result<Token> {
        match self.await {
            Ok(resp) => resp.parse_request_token().await,
            Err(err) => Err(err.into()),
        }
    }

    async fn parse_access_token(self) -> Result<Token> {
        match self.await {
            Ok(resp) => resp.parse_access_token().await,
            Err(err) => Err(err.into()),
        }
    }
}

mod private {
    use std::future::Future;

    use reqwest::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<T, E> SealedWrapper for T
    where
        T: Future<Output = Result<Response, E>>,
        E: Into<Error>,
    {
    }
}
