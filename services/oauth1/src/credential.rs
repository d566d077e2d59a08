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

use crate::constants::{SECRET, TOKEN, USER_ID};
use oauthsign_core::utils::Redact;
use oauthsign_core::{Error, Result, SigningCredential};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

/// Credential that identifies the calling application: the consumer key and
/// consumer secret.
///
/// Fields can only be set at construction time.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppCredentials {
    key: String,
    secret: String,
}

impl AppCredentials {
    /// Create a new application credential.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The consumer key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The consumer secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Display for AppCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppCredentials({}, {})", self.key, Redact::full(&self.secret))
    }
}

impl Debug for AppCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl SigningCredential for AppCredentials {
    fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

/// A token and its secret, signing on behalf of an end-user.
pub trait TokenCredential {
    /// Value sent as `oauth_token`.
    fn token(&self) -> &str;

    /// Secret appended to the signing key.
    fn token_secret(&self) -> &str;
}

/// Credential of one authorized end-user, obtained through the three-legged flow.
///
/// Ordering compares `user_id` first, so collections of credentials sort by user.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientCredentials {
    user_id: u64,
    token: String,
    secret: String,
}

impl ClientCredentials {
    /// Create a new client credential.
    pub fn new(user_id: u64, token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
            secret: secret.into(),
        }
    }

    /// The id of the user that authorized this token.
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// The access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The access token secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Convert into a plain `user_id`/`token`/`secret` mapping for persistence.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (USER_ID.to_string(), self.user_id.to_string()),
            (TOKEN.to_string(), self.token.clone()),
            (SECRET.to_string(), self.secret.clone()),
        ])
    }

    /// Build from a plain `user_id`/`token`/`secret` mapping.
    ///
    /// Unknown keys are ignored.
    pub fn from_map<I, K, V>(map: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let (mut user_id, mut token, mut secret) = (None, None, None);
        for (k, v) in map {
            match k.as_ref() {
                USER_ID => user_id = Some(v.into()),
                TOKEN => token = Some(v.into()),
                SECRET => secret = Some(v.into()),
                _ => {}
            }
        }

        let user_id = user_id
            .ok_or_else(|| Error::credential_invalid("client credential misses user_id"))?;
        let user_id = user_id.parse::<u64>().map_err(|e| {
            Error::credential_invalid(format!("client credential has invalid user_id {user_id}"))
                .with_source(e)
        })?;
        let token =
            token.ok_or_else(|| Error::credential_invalid("client credential misses token"))?;
        let secret =
            secret.ok_or_else(|| Error::credential_invalid("client credential misses secret"))?;

        Ok(Self::new(user_id, token, secret))
    }
}

impl Display for ClientCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ClientCredentials({}, {}, {})",
            self.user_id,
            self.token,
            Redact::full(&self.secret)
        )
    }
}

impl Debug for ClientCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl SigningCredential for ClientCredentials {
    fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.secret.is_empty()
    }
}

impl TokenCredential for ClientCredentials {
    fn token(&self) -> &str {
        &self.token
    }

    fn token_secret(&self) -> &str {
        &self.secret
    }
}

/// Temporary credential returned by the request token endpoint.
///
/// It is only good for sending the user to the authorization page and for
/// exchanging the verifier into [`ClientCredentials`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RequestToken {
    token: String,
    secret: String,
    callback_confirmed: bool,
}

impl RequestToken {
    /// Create a new request token.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
            callback_confirmed: false,
        }
    }

    /// Set whether the provider confirmed the callback url.
    pub fn with_callback_confirmed(mut self, confirmed: bool) -> Self {
        self.callback_confirmed = confirmed;
        self
    }

    /// The request token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The request token secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the provider answered `oauth_callback_confirmed=true`.
    pub fn callback_confirmed(&self) -> bool {
        self.callback_confirmed
    }
}

impl Display for RequestToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RequestToken({}, {})",
            self.token,
            Redact::full(&self.secret)
        )
    }
}

impl Debug for RequestToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl TokenCredential for RequestToken {
    fn token(&self) -> &str {
        &self.token
    }

    fn token_secret(&self) -> &str {
        &self.secret
    }
}
