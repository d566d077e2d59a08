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

use crate::credential::{AppCredentials, ClientCredentials};
use async_trait::async_trait;
use oauthsign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides fixed application credentials.
///
/// This provider is used when you have the consumer key and consumer secret
/// directly and want to use them without any dynamic loading.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: AppCredentials,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with consumer key and consumer secret.
    pub fn new(key: &str, secret: &str) -> Self {
        Self {
            credential: AppCredentials::new(key, secret),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = AppCredentials;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

/// StaticClientCredentialProvider provides fixed end-user credentials, for
/// example loaded from a secret store by the application.
#[derive(Debug, Clone)]
pub struct StaticClientCredentialProvider {
    credential: ClientCredentials,
}

impl StaticClientCredentialProvider {
    /// Create a new StaticClientCredentialProvider.
    pub fn new(user_id: u64, token: &str, secret: &str) -> Self {
        Self {
            credential: ClientCredentials::new(user_id, token, secret),
        }
    }
}

impl From<ClientCredentials> for StaticClientCredentialProvider {
    fn from(credential: ClientCredentials) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticClientCredentialProvider {
    type Credential = ClientCredentials;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::provide_credential::EnvCredentialProvider;
    use oauthsign_core::{ProvideCredentialChain, StaticEnv};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_static_credential_provider() -> anyhow::Result<()> {
        let ctx = Context::new();

        let cred = StaticCredentialProvider::new("app_1", "secret")
            .provide_credential(&ctx)
            .await?;
        assert_eq!(cred, Some(AppCredentials::new("app_1", "secret")));

        let cred = StaticClientCredentialProvider::new(1, "token_1", "secret")
            .provide_credential(&ctx)
            .await?;
        assert_eq!(cred, Some(ClientCredentials::new(1, "token_1", "secret")));

        let cred = StaticClientCredentialProvider::from(ClientCredentials::new(2, "t", "s"))
            .provide_credential(&ctx)
            .await?;
        assert_eq!(cred.map(|c| c.user_id()), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn test_chain_prefers_env_over_static() -> anyhow::Result<()> {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(StaticCredentialProvider::new("fallback", "secret"));

        let cred = chain.provide_credential(&Context::new()).await?;
        assert_eq!(cred.map(|c| c.key().to_string()).as_deref(), Some("fallback"));

        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (TWITTER_APP_KEY.to_string(), "from env".to_string()),
                (TWITTER_APP_SECRET.to_string(), "secret".to_string()),
            ]),
        });
        let cred = chain.provide_credential(&ctx).await?;
        assert_eq!(cred.map(|c| c.key().to_string()).as_deref(), Some("from env"));

        Ok(())
    }
}
