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

use std::sync::{Arc, Mutex};

use crate::credential::{AppCredentials, ClientCredentials};
use crate::request::OAuthRequest;
use crate::sign_request::RequestSigner;
use http::HeaderMap;
use log::debug;
use oauthsign_core::{Context, Error, ProvideCredential, Result, SigningCredential};

/// Signer joins credential providers with a [`RequestSigner`].
///
/// Credentials are loaded on first use and kept until they turn invalid.
///
/// ```no_run
/// use oauthsign_core::{Context, OsEnv};
/// use oauthsign_oauth1::{
///     EnvClientCredentialProvider, EnvCredentialProvider, OAuthRequest, Signer,
/// };
///
/// # async fn run() -> oauthsign_core::Result<()> {
/// let ctx = Context::new().with_env(OsEnv);
/// let signer = Signer::new(ctx, EnvCredentialProvider::new())
///     .with_client_loader(EnvClientCredentialProvider::new());
///
/// let req = OAuthRequest::new(
///     "GET",
///     "https://api.twitter.com/1.1/account/verify_credentials.json",
/// )?;
/// let headers = signer.sign(&req).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    ctx: Context,
    builder: RequestSigner,

    app_loader: Arc<dyn ProvideCredential<Credential = AppCredentials>>,
    client_loader: Option<Arc<dyn ProvideCredential<Credential = ClientCredentials>>>,
    app: Arc<Mutex<Option<AppCredentials>>>,
    client: Arc<Mutex<Option<ClientCredentials>>>,
}

impl Signer {
    /// Create a new signer loading application credentials from `app_loader`.
    pub fn new(
        ctx: Context,
        app_loader: impl ProvideCredential<Credential = AppCredentials>,
    ) -> Self {
        Self {
            ctx,
            builder: RequestSigner::new(),

            app_loader: Arc::new(app_loader),
            client_loader: None,
            app: Arc::new(Mutex::new(None)),
            client: Arc::new(Mutex::new(None)),
        }
    }

    /// Load end-user credentials from `client_loader`, needed by [`Signer::sign`].
    pub fn with_client_loader(
        mut self,
        client_loader: impl ProvideCredential<Credential = ClientCredentials>,
    ) -> Self {
        self.client_loader = Some(Arc::new(client_loader));
        self
    }

    /// Replace the request signer, for example one carrying overrides.
    pub fn with_request_signer(mut self, builder: RequestSigner) -> Self {
        self.builder = builder;
        self
    }

    /// Sign a request on behalf of the loaded end-user.
    pub async fn sign(&self, req: &OAuthRequest) -> Result<HeaderMap> {
        let app = self.app_credentials().await?;

        let Some(client_loader) = &self.client_loader else {
            return Err(Error::credential_invalid("no client credential loader configured"));
        };
        let client = load(&self.ctx, &self.client, client_loader.as_ref())
            .await?
            .ok_or_else(|| Error::credential_invalid("no client credential loaded"))?;

        self.builder.sign_with_token(req, &app, &client)
    }

    /// Sign a request with application credentials only.
    pub async fn sign_as_app(&self, req: &OAuthRequest) -> Result<HeaderMap> {
        let app = self.app_credentials().await?;
        self.builder.sign(req, &app)
    }

    async fn app_credentials(&self) -> Result<AppCredentials> {
        load(&self.ctx, &self.app, self.app_loader.as_ref())
            .await?
            .ok_or_else(|| Error::credential_invalid("no app credential loaded"))
    }
}

async fn load<K: SigningCredential>(
    ctx: &Context,
    cache: &Mutex<Option<K>>,
    loader: &dyn ProvideCredential<Credential = K>,
) -> Result<Option<K>> {
    let cached = cache.lock().expect("lock poisoned").clone();
    if cached.is_valid() {
        return Ok(cached);
    }

    debug!("loading credential from {loader:?}");
    let loaded = loader.provide_credential(ctx).await?;
    *cache.lock().expect("lock poisoned") = loaded.clone();
    Ok(loaded)
}
