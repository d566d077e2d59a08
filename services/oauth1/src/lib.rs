// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! OAuth 1.0a HMAC-SHA1 signing for Twitter style APIs.
//!
//! This crate builds the `Authorization` header of OAuth 1.0a requests and
//! the signed requests of the three-legged flow used to obtain user tokens.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oauthsign_oauth1::{AppCredentials, ClientCredentials, OAuthRequest, RequestSigner};
//!
//! # fn main() -> oauthsign_core::Result<()> {
//! let app = AppCredentials::new("your-consumer-key", "your-consumer-secret");
//! let user = ClientCredentials::new(12345, "user-token", "user-token-secret");
//!
//! let req = OAuthRequest::new("POST", "https://api.twitter.com/1.1/statuses/update.json")?
//!     .with_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
//!     .with_param("include_entities", true);
//!
//! let headers = RequestSigner::new().sign_with_token(&req, &app, &user)?;
//! let http_req = req.to_http_request(headers)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Three-legged flow
//!
//! ```no_run
//! use oauthsign_core::Context;
//! use oauthsign_http_send_reqwest::ReqwestHttpSend;
//! use oauthsign_oauth1::{AppCredentials, TokenExchange};
//!
//! # async fn run() -> oauthsign_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! let app = AppCredentials::new("your-consumer-key", "your-consumer-secret");
//! let exchange = TokenExchange::default();
//!
//! let token = exchange
//!     .request_token(&ctx, &app, "https://example.com/callback")
//!     .await?;
//! println!("visit {}", exchange.endpoints().redirect_url(token.token()));
//!
//! // The provider redirects the user back with `oauth_verifier`.
//! let user = exchange.access_token(&ctx, &app, &token, "the-verifier").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential Sources
//!
//! ### Environment Variables
//!
//! ```bash
//! export TWITTER_APP_KEY=your-consumer-key
//! export TWITTER_APP_SECRET=your-consumer-secret
//! export TWITTER_USER_ID=12345              # Optional, for user credentials
//! export TWITTER_USER_TOKEN=user-token
//! export TWITTER_USER_SECRET=user-token-secret
//! ```

mod constants;
pub use constants::{
    DEFAULT_NONCE_LENGTH, OAUTH_VERSION_1_0, SIGNATURE_METHOD_HMAC_SHA1,
    TWITTER_ACCESS_TOKEN_URL, TWITTER_AUTHENTICATE_URL, TWITTER_AUTHORIZE_URL,
    TWITTER_REQUEST_TOKEN_URL,
};

mod encode;
pub use encode::{encode_value, percent_decode, percent_encode, ParamValue};

mod nonce;
pub use nonce::{generate_nonce, generate_timestamp};

mod credential;
pub use credential::{AppCredentials, ClientCredentials, RequestToken, TokenCredential};

mod request;
pub use request::OAuthRequest;

mod sign_request;
pub use sign_request::{
    build_header_string, build_param_string, build_signature, build_signature_base_string,
    build_signing_key, Overrides, RequestSigner,
};

mod flow;
pub use flow::{
    extract_access_token, extract_request_token, obtain_access_token, obtain_request_token,
    redirect_url, Endpoints,
};

mod config;
pub use config::Config;

mod provide_credential;
pub use provide_credential::*;

mod exchange;
pub use exchange::TokenExchange;

mod signer;
pub use signer::Signer;
