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

use crate::config::Config;
use crate::constants::{TWITTER_APP_KEY, TWITTER_CALLBACK_URL};
use crate::credential::{AppCredentials, ClientCredentials, RequestToken};
use crate::flow::{extract_access_token, extract_request_token, Endpoints};
use crate::request::OAuthRequest;
use crate::sign_request::Overrides;
use http::HeaderMap;
use log::debug;
use oauthsign_core::{Context, Error, Result};

/// TokenExchange sends the token requests of the three-legged flow through
/// the http client configured in [`Context`].
///
/// Redirecting the user and receiving the verifier stay with the caller.
#[derive(Debug, Clone, Default)]
pub struct TokenExchange {
    endpoints: Endpoints,
}

impl TokenExchange {
    /// Create a new TokenExchange talking to the given endpoints.
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Endpoints used by this exchange.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Ask for a request token.
    pub async fn request_token(
        &self,
        ctx: &Context,
        app: &AppCredentials,
        callback: &str,
    ) -> Result<RequestToken> {
        let (req, headers) = self
            .endpoints
            .obtain_request_token(app, callback, Overrides::default())?;
        let body = send(ctx, &req, headers).await?;

        let token = extract_request_token(&body)?;
        if !token.callback_confirmed() {
            debug!("request token issued without a confirmed callback");
        }
        Ok(token)
    }

    /// Ask for a request token with the application credentials and the
    /// callback url of `config`.
    pub async fn request_token_from_config(
        &self,
        ctx: &Context,
        config: &Config,
    ) -> Result<RequestToken> {
        let app = config
            .app_credentials()?
            .ok_or_else(|| Error::config_invalid(format!("{TWITTER_APP_KEY} is required")))?;
        let callback = config
            .callback_url
            .as_deref()
            .ok_or_else(|| Error::config_invalid(format!("{TWITTER_CALLBACK_URL} is required")))?;

        self.request_token(ctx, &app, callback).await
    }

    /// Exchange an authorized request token and its verifier into the
    /// credentials of the user.
    pub async fn access_token(
        &self,
        ctx: &Context,
        app: &AppCredentials,
        request_token: &RequestToken,
        verifier: &str,
    ) -> Result<ClientCredentials> {
        let (req, headers) = self.endpoints.obtain_access_token_with_secret(
            app,
            request_token,
            verifier,
            Overrides::default(),
        )?;
        let body = send(ctx, &req, headers).await?;

        extract_access_token(&body)
    }
}

async fn send(ctx: &Context, req: &OAuthRequest, headers: HeaderMap) -> Result<String> {
    let resp = ctx.http_send_as_string(req.to_http_request(headers)?).await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::remote_protocol(format!(
            "token endpoint {} answered {status}: {}",
            req.url(),
            resp.body()
        )));
    }

    Ok(resp.into_body())
}
