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

//! Helpers of the three-legged flow.
//!
//! The flow goes `NoToken -> RequestTokenObtained -> UserAuthorized(verifier)
//! -> AccessTokenObtained`. The caller drives it: these helpers only build
//! correctly signed requests for every step and decode the answers.

use crate::constants::*;
use crate::credential::{AppCredentials, ClientCredentials, RequestToken};
use crate::encode::percent_encode;
use crate::request::OAuthRequest;
use crate::sign_request::{Overrides, RequestSigner};
use http::HeaderMap;
use oauthsign_core::{Error, Result};
use std::collections::HashMap;

/// Endpoints of a provider's three-legged flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    request_token: String,
    authorize: String,
    authenticate: String,
    access_token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::twitter()
    }
}

impl Endpoints {
    /// Endpoints of the Twitter API.
    pub fn twitter() -> Self {
        Self {
            request_token: TWITTER_REQUEST_TOKEN_URL.to_string(),
            authorize: TWITTER_AUTHORIZE_URL.to_string(),
            authenticate: TWITTER_AUTHENTICATE_URL.to_string(),
            access_token: TWITTER_ACCESS_TOKEN_URL.to_string(),
        }
    }

    /// Set the request token endpoint.
    pub fn with_request_token_url(mut self, url: impl Into<String>) -> Self {
        self.request_token = url.into();
        self
    }

    /// Set the authorize endpoint.
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize = url.into();
        self
    }

    /// Set the authenticate endpoint.
    pub fn with_authenticate_url(mut self, url: impl Into<String>) -> Self {
        self.authenticate = url.into();
        self
    }

    /// Set the access token endpoint.
    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token = url.into();
        self
    }

    /// Build the signed request asking for a request token.
    ///
    /// `callback` is sent as `oauth_callback` and signed with the application
    /// credentials only. A callback in `overrides` is replaced by `callback`.
    pub fn obtain_request_token(
        &self,
        app: &AppCredentials,
        callback: &str,
        overrides: Overrides,
    ) -> Result<(OAuthRequest, HeaderMap)> {
        let req = OAuthRequest::new("POST", &self.request_token)?;
        let signer = RequestSigner::new().with_overrides(overrides.with_callback(callback));

        let headers = signer.sign(&req, app)?;
        Ok((req, headers))
    }

    /// Url sending the user to sign in with the provider.
    pub fn redirect_url(&self, request_token: &str) -> String {
        format!(
            "{}?{}={}",
            self.authenticate,
            OAUTH_TOKEN,
            percent_encode(request_token)
        )
    }

    /// Url sending the user to authorize the application, asking again even
    /// if the user already did.
    pub fn authorize_url(&self, request_token: &str) -> String {
        format!(
            "{}?{}={}",
            self.authorize,
            OAUTH_TOKEN,
            percent_encode(request_token)
        )
    }

    /// Build the signed request exchanging a request token and its verifier
    /// into an access token.
    ///
    /// Only the token is known here, the signing key carries an empty token
    /// secret. Use [`Endpoints::obtain_access_token_with_secret`] to sign
    /// with the request token secret.
    pub fn obtain_access_token(
        &self,
        app: &AppCredentials,
        request_token: &str,
        verifier: &str,
        overrides: Overrides,
    ) -> Result<(OAuthRequest, HeaderMap)> {
        self.obtain_access_token_with_secret(
            app,
            &RequestToken::new(request_token, ""),
            verifier,
            overrides,
        )
    }

    /// Build the signed request exchanging a request token and its verifier
    /// into an access token, signed with the request token secret.
    pub fn obtain_access_token_with_secret(
        &self,
        app: &AppCredentials,
        request_token: &RequestToken,
        verifier: &str,
        overrides: Overrides,
    ) -> Result<(OAuthRequest, HeaderMap)> {
        let req =
            OAuthRequest::new("POST", &self.access_token)?.with_param(OAUTH_VERIFIER, verifier);
        let signer = RequestSigner::new().with_overrides(overrides);

        let headers = signer.sign_with_token(&req, app, request_token)?;
        Ok((req, headers))
    }
}

/// Build the signed request asking Twitter for a request token.
pub fn obtain_request_token(
    app: &AppCredentials,
    callback: &str,
    overrides: Overrides,
) -> Result<(OAuthRequest, HeaderMap)> {
    Endpoints::twitter().obtain_request_token(app, callback, overrides)
}

/// Url sending the user to sign in with Twitter.
pub fn redirect_url(request_token: &str) -> String {
    Endpoints::twitter().redirect_url(request_token)
}

/// Build the signed request asking Twitter for an access token.
pub fn obtain_access_token(
    app: &AppCredentials,
    request_token: &str,
    verifier: &str,
    overrides: Overrides,
) -> Result<(OAuthRequest, HeaderMap)> {
    Endpoints::twitter().obtain_access_token(app, request_token, verifier, overrides)
}

fn parse_form(body: &str) -> HashMap<String, String> {
    form_urlencoded::parse(body.trim().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn take_field(form: &mut HashMap<String, String>, key: &str) -> Result<String> {
    form.remove(key)
        .ok_or_else(|| Error::remote_protocol(format!("response body misses {key}")))
}

/// Decode the body answered by the request token endpoint.
pub fn extract_request_token(body: &str) -> Result<RequestToken> {
    let mut form = parse_form(body);

    let token = take_field(&mut form, OAUTH_TOKEN)?;
    let secret = take_field(&mut form, OAUTH_TOKEN_SECRET)?;
    let confirmed = form
        .get(OAUTH_CALLBACK_CONFIRMED)
        .is_some_and(|v| v == "true");

    Ok(RequestToken::new(token, secret).with_callback_confirmed(confirmed))
}

/// Decode the body answered by the access token endpoint.
pub fn extract_access_token(body: &str) -> Result<ClientCredentials> {
    let mut form = parse_form(body);

    let token = take_field(&mut form, OAUTH_TOKEN)?;
    let secret = take_field(&mut form, OAUTH_TOKEN_SECRET)?;
    let user_id = take_field(&mut form, USER_ID)?;
    let user_id = user_id.parse::<u64>().map_err(|e| {
        Error::remote_protocol(format!("response body has invalid user_id {user_id}"))
            .with_source(e)
    })?;

    Ok(ClientCredentials::new(user_id, token, secret))
}
