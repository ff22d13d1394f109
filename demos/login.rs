//! Interactive login against a Magento store.
//!
//! Walks the whole flow on the command line: acquire a request token, hand
//! the authorization URL to the user, redeem the verifier pasted back from
//! the callback page and fetch the customer list with the access token.
//!
//! Configuration comes from the environment:
//!
//! ```text
//! MAGENTO_BASE_URI          e.g. http://magento.local
//! MAGENTO_CONSUMER_KEY
//! MAGENTO_CONSUMER_SECRET
//! MAGENTO_CALLBACK_URL      optional, defaults to oob
//! MAGENTO_SCOPE             optional, "admin" (default) or "customer"
//! ```

use std::env;
use std::error::Error;
use std::io::{self, Write};

use magento_oauth1::{AuthorizationScope, Credentials, MagentoService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let base_uri = env::var("MAGENTO_BASE_URI")?;
    let consumer_key = env::var("MAGENTO_CONSUMER_KEY")?;
    let consumer_secret = env::var("MAGENTO_CONSUMER_SECRET")?;
    let callback_url =
        env::var("MAGENTO_CALLBACK_URL").unwrap_or_else(|_| "oob".to_string());
    let scope = match env::var("MAGENTO_SCOPE") {
        Ok(scope) => scope.parse::<AuthorizationScope>()?,
        Err(_) => AuthorizationScope::default(),
    };

    let credentials = Credentials::new(consumer_key, consumer_secret).callback(callback_url);
    let service = MagentoService::builder()
        .credentials(credentials)
        .base_uri(base_uri)
        .authorization_scope(scope)
        .build()?;

    let token = service.request_request_token().await?;
    println!(
        "please authorize at: {}",
        service.authorization_url(&token)
    );
    print!("paste oauth_verifier (or \"rejected\" if you cancelled): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let verifier = line.trim();

    if verifier.is_empty() || verifier == "rejected" {
        println!("authorization was cancelled.");
        return Ok(());
    }

    let token = service
        .request_access_token(token.request_token(), verifier)
        .await?;
    println!("access token acquired: {}", token.access_token());

    let customers = service
        .get("/api/rest/customers")?
        .header("Accept", "*/*")
        .send()
        .await?
        .text()
        .await?;
    println!("customers: {}", customers);

    Ok(())
}
