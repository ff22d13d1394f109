use reqwest::blocking::Response;

use crate::token::{self, Token};
use crate::{Error, Result};

/// Blocking counterpart of [`crate::TokenReader`].
// this trait is sealed
pub trait TokenReader: private::Sealed {
    fn parse_request_token(self) -> Result<Token>;

    fn parse_access_token(self) -> Result<Token>;
}

impl TokenReader for Response {
    fn parse_request_token(self) -> Result<Token> {
        let text = self.text()?;
        Ok(token::parse_request_token(&text)?)
    }

    fn parse_access_token(self) -> Result<Token> {
        let text = self.text()?;
        Ok(token::parse_access_token(&text)?)
    }
}

/// Same parsing, chainable off a blocking send result.
// this trait is also sealed
pub trait TokenReaderBlocking: private::SealedWrapper {
    fn parse_request_token(self) -> Result<Token>;

    fn parse_access_token(self) -> Result<Token>;
}

impl<E> TokenReaderBlocking for std::result::Result<Response, E>
where
    E: Into<Error>,
{
    fn parse_request_token(self) -> Result<Token> {
        match self {
            Ok(resp) => resp.parse_request_token(),
            Err(err) => Err(err.into()),
        }
    }

    fn parse_access_token(self) -> Result<Token> {
        match self {
            Ok(resp) => resp.parse_access_token(),
            Err(err) => Err(err.into()),
        }
    }
}

mod private {
    use reqwest::blocking::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<E> SealedWrapper for Result<Response, E> where E: Into<Error> {}
}
