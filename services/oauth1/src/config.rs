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

use std::fmt::{Debug, Formatter};

use crate::constants::*;
use crate::credential::{AppCredentials, ClientCredentials};
use oauthsign_core::{utils::Redact, Context, Error, Result};

/// Config carries all the configuration needed to sign requests for one
/// application and, optionally, one end-user.
#[derive(Clone, Default)]
pub struct Config {
    /// `app_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_APP_KEY`
    pub app_key: Option<String>,
    /// `app_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_APP_SECRET`
    pub app_secret: Option<String>,
    /// `user_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_USER_ID`
    pub user_id: Option<String>,
    /// `user_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_USER_TOKEN`
    pub user_token: Option<String>,
    /// `user_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_USER_SECRET`
    pub user_secret: Option<String>,
    /// `callback_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `TWITTER_CALLBACK_URL`
    pub callback_url: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set app_key
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Set app_secret
    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Set user_id
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set user_token
    pub fn with_user_token(mut self, user_token: impl Into<String>) -> Self {
        self.user_token = Some(user_token.into());
        self
    }

    /// Set user_secret
    pub fn with_user_secret(mut self, user_secret: impl Into<String>) -> Self {
        self.user_secret = Some(user_secret.into());
        self
    }

    /// Set callback_url
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Load config from env, keeping the fields that are already set.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(TWITTER_APP_KEY) {
            self.app_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TWITTER_APP_SECRET) {
            self.app_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TWITTER_USER_ID) {
            self.user_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TWITTER_USER_TOKEN) {
            self.user_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TWITTER_USER_SECRET) {
            self.user_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TWITTER_CALLBACK_URL) {
            self.callback_url.get_or_insert(v);
        }

        self
    }

    /// Build the application credential.
    ///
    /// Returns `Ok(None)` if neither key nor secret is configured.
    pub fn app_credentials(&self) -> Result<Option<AppCredentials>> {
        match (&self.app_key, &self.app_secret) {
            (Some(key), Some(secret)) => Ok(Some(AppCredentials::new(key, secret))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::config_invalid(format!(
                "{TWITTER_APP_SECRET} is required when {TWITTER_APP_KEY} is set"
            ))),
            (None, Some(_)) => Err(Error::config_invalid(format!(
                "{TWITTER_APP_KEY} is required when {TWITTER_APP_SECRET} is set"
            ))),
        }
    }

    /// Build the client credential.
    ///
    /// Returns `Ok(None)` if no user field is configured.
    pub fn client_credentials(&self) -> Result<Option<ClientCredentials>> {
        match (&self.user_id, &self.user_token, &self.user_secret) {
            (None, None, None) => Ok(None),
            (Some(user_id), Some(token), Some(secret)) => {
                let user_id = user_id.parse::<u64>().map_err(|e| {
                    Error::config_invalid(format!("{TWITTER_USER_ID} {user_id} is not a number"))
                        .with_source(e)
                })?;
                Ok(Some(ClientCredentials::new(user_id, token, secret)))
            }
            _ => Err(Error::config_invalid(format!(
                "{TWITTER_USER_ID}, {TWITTER_USER_TOKEN} and {TWITTER_USER_SECRET} must be set together"
            ))),
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_key", &self.app_key.as_ref().map(Redact::from))
            .field("app_secret", &self.app_secret.as_ref().map(Redact::from))
            .field("user_id", &self.user_id)
            .field("user_token", &self.user_token.as_ref().map(Redact::from))
            .field("user_secret", &self.user_secret.as_ref().map(Redact::from))
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauthsign_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx(&[
            (TWITTER_APP_KEY, "the key"),
            (TWITTER_APP_SECRET, "the secret"),
            (TWITTER_USER_ID, "42"),
            (TWITTER_USER_TOKEN, "the token"),
            (TWITTER_USER_SECRET, "the user secret"),
            (TWITTER_CALLBACK_URL, "http://localhost/callback"),
        ]);

        let config = Config::new().from_env(&ctx);
        let app = config.app_credentials().unwrap().unwrap();
        assert_eq!(app.key(), "the key");
        assert_eq!(app.secret(), "the secret");

        let client = config.client_credentials().unwrap().unwrap();
        assert_eq!(client, ClientCredentials::new(42, "the token", "the user secret"));
        assert_eq!(config.callback_url.as_deref(), Some("http://localhost/callback"));
    }

    #[test]
    fn test_fields_take_precedence_over_env() {
        let ctx = ctx(&[(TWITTER_APP_KEY, "env key"), (TWITTER_APP_SECRET, "env secret")]);

        let config = Config::new().with_app_key("field key").from_env(&ctx);
        let app = config.app_credentials().unwrap().unwrap();
        assert_eq!(app.key(), "field key");
        assert_eq!(app.secret(), "env secret");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::new().from_env(&Context::new());
        assert!(config.app_credentials().unwrap().is_none());
        assert!(config.client_credentials().unwrap().is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::new().with_app_key("key");
        let err = config.app_credentials().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let config = Config::new().with_user_id("1").with_user_token("token");
        let err = config.client_credentials().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let config = Config::new()
            .with_user_id("one")
            .with_user_token("token")
            .with_user_secret("secret");
        let err = config.client_credentials().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new()
            .with_app_key("cChZNFj6T5R0TigYB9yd1w")
            .with_app_secret("L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg"));
        assert!(rendered.contains("L8q***yOg"));
    }
}
