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
use crate::credential::{AppCredentials, ClientCredentials};
use async_trait::async_trait;
use oauthsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads application credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `TWITTER_APP_KEY`: The consumer key
/// - `TWITTER_APP_SECRET`: The consumer secret
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = AppCredentials;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Config::new().from_env(ctx).app_credentials()
    }
}

/// EnvClientCredentialProvider loads end-user credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `TWITTER_USER_ID`: The numeric id of the user
/// - `TWITTER_USER_TOKEN`: The access token
/// - `TWITTER_USER_SECRET`: The access token secret
#[derive(Debug, Default)]
pub struct EnvClientCredentialProvider;

impl EnvClientCredentialProvider {
    /// Create a new EnvClientCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvClientCredentialProvider {
    type Credential = ClientCredentials;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Config::new().from_env(ctx).client_credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use oauthsign_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    fn ctx(envs: HashMap<String, String>) -> Context {
        Context::new().with_env(StaticEnv { envs })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let envs = HashMap::from([
            (TWITTER_APP_KEY.to_string(), "the key".to_string()),
            (TWITTER_APP_SECRET.to_string(), "the secret".to_string()),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx(envs))
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.key(), "the key");
        assert_eq!(cred.secret(), "the secret");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_missing_credentials() -> anyhow::Result<()> {
        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx(HashMap::new()))
            .await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_client_credential_provider() -> anyhow::Result<()> {
        let envs = HashMap::from([
            (TWITTER_USER_ID.to_string(), "12345".to_string()),
            (TWITTER_USER_TOKEN.to_string(), "the token".to_string()),
            (TWITTER_USER_SECRET.to_string(), "the secret".to_string()),
        ]);

        let cred = EnvClientCredentialProvider::new()
            .provide_credential(&ctx(envs))
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.user_id(), 12345);
        assert_eq!(cred.token(), "the token");
        assert_eq!(cred.secret(), "the secret");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_client_credential_provider_invalid_user_id() {
        let envs = HashMap::from([
            (TWITTER_USER_ID.to_string(), "the user id".to_string()),
            (TWITTER_USER_TOKEN.to_string(), "the token".to_string()),
            (TWITTER_USER_SECRET.to_string(), "the secret".to_string()),
        ]);

        let err = EnvClientCredentialProvider::new()
            .provide_credential(&ctx(envs))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
