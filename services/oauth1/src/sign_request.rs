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

use crate::constants::*;
use crate::credential::{AppCredentials, TokenCredential};
use crate::encode::{encode_value, percent_encode, ParamValue};
use crate::nonce::{generate_nonce, generate_timestamp};
use crate::request::OAuthRequest;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use log::debug;
use oauthsign_core::hash::base64_hmac_sha1;
use oauthsign_core::{Error, Result, SigningCredential};
use std::collections::BTreeMap;

/// Overrides for the generated protocol parameters.
///
/// Nonce and timestamp are freshly generated for every signature unless set
/// here. Keep them fixed to get reproducible signatures in tests, or to resend
/// the exact same request within one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    nonce: Option<String>,
    timestamp: Option<i64>,
    callback: Option<String>,
}

impl Overrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this `oauth_nonce` instead of a generated one.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Use this `oauth_timestamp` instead of the current time.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Send this `oauth_callback` along with the protocol parameters.
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// The overridden nonce.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// The overridden timestamp.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// The callback url.
    pub fn callback(&self) -> Option<&str> {
        self.callback.as_deref()
    }
}

/// RequestSigner builds the OAuth 1.0a `Authorization` header of a request.
///
/// ```
/// use oauthsign_oauth1::{AppCredentials, ClientCredentials, OAuthRequest, RequestSigner};
///
/// # fn main() -> oauthsign_core::Result<()> {
/// let app = AppCredentials::new("consumer-key", "consumer-secret");
/// let client = ClientCredentials::new(1, "token", "token-secret");
/// let req = OAuthRequest::new("POST", "https://api.twitter.com/1.1/statuses/update.json")?
///     .with_param("status", "hello");
///
/// let headers = RequestSigner::new().sign_with_token(&req, &app, &client)?;
/// assert!(headers["authorization"].to_str().unwrap().starts_with("OAuth "));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    overrides: Overrides,
}

impl RequestSigner {
    /// Create a new signer that generates nonce and timestamp per request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given overrides for every request signed by this signer.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sign a request with application credentials only.
    ///
    /// Used by the request token step, which has no token yet.
    pub fn sign(&self, req: &OAuthRequest, app: &AppCredentials) -> Result<HeaderMap> {
        self.build_headers(req, app, None)
    }

    /// Sign a request on behalf of an end-user.
    pub fn sign_with_token(
        &self,
        req: &OAuthRequest,
        app: &AppCredentials,
        token: &impl TokenCredential,
    ) -> Result<HeaderMap> {
        self.build_headers(req, app, Some((token.token(), token.token_secret())))
    }

    fn build_headers(
        &self,
        req: &OAuthRequest,
        app: &AppCredentials,
        token: Option<(&str, &str)>,
    ) -> Result<HeaderMap> {
        let authorization = self.build_authorization(req, app, token)?;

        let mut value = HeaderValue::from_str(&authorization)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Build the `Authorization` header value.
    fn build_authorization(
        &self,
        req: &OAuthRequest,
        app: &AppCredentials,
        token: Option<(&str, &str)>,
    ) -> Result<String> {
        if !app.is_valid() {
            return Err(Error::credential_invalid(
                "consumer key and consumer secret must not be empty",
            ));
        }

        let mut oauth_params = self.build_oauth_params(app, token)?;

        // Protocol parameters take part in the signature together with the
        // request parameters, but only the former go into the header.
        let mut signing_params: BTreeMap<String, ParamValue> = oauth_params
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::from(v)))
            .collect();
        for (k, v) in req.params() {
            if signing_params.contains_key(k) {
                return Err(Error::request_malformed(format!(
                    "request parameter {k} collides with a protocol parameter"
                )));
            }
            signing_params.insert(k.clone(), v.clone());
        }

        let param_string = build_param_string(&signing_params)?;
        let base_string =
            build_signature_base_string(req.method().as_str(), req.url(), &param_string)?;
        debug!("calculated signature base string: {base_string}");

        let signing_key = build_signing_key(app.secret(), token.map(|(_, secret)| secret));
        let signature = build_signature(&base_string, &signing_key);

        oauth_params.insert(OAUTH_SIGNATURE.to_string(), signature);
        Ok(build_header_string(&oauth_params))
    }

    fn build_oauth_params(
        &self,
        app: &AppCredentials,
        token: Option<(&str, &str)>,
    ) -> Result<BTreeMap<String, String>> {
        let nonce = match self.overrides.nonce() {
            Some(v) => v.to_string(),
            None => generate_nonce(DEFAULT_NONCE_LENGTH),
        };
        let timestamp = self.overrides.timestamp().unwrap_or_else(generate_timestamp);

        let mut params = BTreeMap::from([
            (OAUTH_CONSUMER_KEY.to_string(), app.key().to_string()),
            (OAUTH_NONCE.to_string(), nonce),
            (
                OAUTH_SIGNATURE_METHOD.to_string(),
                SIGNATURE_METHOD_HMAC_SHA1.to_string(),
            ),
            (OAUTH_TIMESTAMP.to_string(), timestamp.to_string()),
            (OAUTH_VERSION.to_string(), OAUTH_VERSION_1_0.to_string()),
        ]);

        if let Some((token, _)) = token {
            if token.is_empty() {
                return Err(Error::credential_invalid("oauth token must not be empty"));
            }
            params.insert(OAUTH_TOKEN.to_string(), token.to_string());
        }
        if let Some(callback) = self.overrides.callback() {
            params.insert(OAUTH_CALLBACK.to_string(), callback.to_string());
        }

        Ok(params)
    }
}

/// Build the normalized parameter string.
///
/// Every name and value is percent encoded, then pairs are sorted by encoded
/// name and encoded value, joined with `=` and `&`.
pub fn build_param_string(params: &BTreeMap<String, ParamValue>) -> Result<String> {
    let mut pairs = params
        .iter()
        .map(|(k, v)| Ok((percent_encode(k), encode_value(v)?)))
        .collect::<Result<Vec<(String, String)>>>()?;
    // Sort on the encoded form, the raw names may order differently.
    pairs.sort();

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }

    Ok(s)
}

/// Build the signature base string: `METHOD&encoded url&encoded parameters`.
///
/// The base url must not carry a query, its parameters belong to the
/// parameter string. A fragment is never part of the signed url and is
/// rejected as well.
pub fn build_signature_base_string(
    method: &str,
    base_url: &str,
    param_string: &str,
) -> Result<String> {
    if base_url.contains('?') {
        return Err(Error::request_malformed(format!(
            "base url {base_url} must not carry a query"
        )));
    }
    if base_url.contains('#') {
        return Err(Error::request_malformed(format!(
            "base url {base_url} must not carry a fragment"
        )));
    }

    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(param_string)
    ))
}

/// Build the HMAC signing key: `encoded consumer secret&encoded token secret`.
///
/// The `&` is kept even without token secret.
pub fn build_signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

/// Sign the base string with HMAC-SHA1, base64 encoded.
pub fn build_signature(base_string: &str, signing_key: &str) -> String {
    base64_hmac_sha1(signing_key.as_bytes(), base_string.as_bytes())
}

/// Format the `Authorization` header value from the protocol parameters.
///
/// Only `oauth_*` parameters are written, sorted by name, each as
/// `name="encoded value"` and separated by `, `.
pub fn build_header_string(oauth_params: &BTreeMap<String, String>) -> String {
    let mut s = String::from("OAuth ");
    for (idx, (k, v)) in oauth_params
        .iter()
        .filter(|(k, _)| k.starts_with("oauth_"))
        .enumerate()
    {
        if idx != 0 {
            s.push_str(", ");
        }
        s.push_str(&percent_encode(k));
        s.push_str("=\"");
        s.push_str(&percent_encode(v));
        s.push('"');
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::ClientCredentials;
    use oauthsign_core::ErrorKind;
    use pretty_assertions::assert_eq;

    const CONSUMER_SECRET: &str = "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw";
    const TOKEN_SECRET: &str = "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE";
    const URL: &str = "https://api.twitter.com/1/statuses/update.json";
    const STATUS: &str = "Hello Ladies + Gentlemen, a signed OAuth request!";

    const PARAM_STRING: &str = "include_entities=true&oauth_consumer_key=xvz1evFS4wEEPTGEFPHBog&oauth_nonce=kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg&oauth_signature_method=HMAC-SHA1&oauth_timestamp=1318622958&oauth_token=370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb&oauth_version=1.0&status=Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21";
    const SIG_BASE_STRING: &str = "POST&https%3A%2F%2Fapi.twitter.com%2F1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521";
    const HEADER_STRING: &str = "OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", oauth_nonce=\"kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\", oauth_signature=\"tnnArxj06cWHq44gCs1OSKk%2FjLY%3D\", oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1318622958\", oauth_token=\"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\", oauth_version=\"1.0\"";

    fn oauth_params() -> BTreeMap<String, String> {
        BTreeMap::from(
            [
                ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
                ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
                ("oauth_signature", "tnnArxj06cWHq44gCs1OSKk/jLY="),
                ("oauth_signature_method", "HMAC-SHA1"),
                ("oauth_timestamp", "1318622958"),
                (
                    "oauth_token",
                    "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                ),
                ("oauth_version", "1.0"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn request_params() -> BTreeMap<String, ParamValue> {
        let mut params: BTreeMap<String, ParamValue> = oauth_params()
            .into_iter()
            .filter(|(k, _)| k != OAUTH_SIGNATURE)
            .map(|(k, v)| (k, ParamValue::from(v)))
            .collect();
        params.insert("include_entities".to_string(), ParamValue::from("true"));
        params.insert("status".to_string(), ParamValue::from(STATUS));
        params
    }

    #[test]
    fn test_build_param_string() {
        assert_eq!(build_param_string(&request_params()).unwrap(), PARAM_STRING);
    }

    #[test]
    fn test_param_string_sorts_on_encoded_names() {
        // `a b` encodes to `a%20b`, which sorts before `a-b` ('%' < '-').
        let params = BTreeMap::from([
            ("a-b".to_string(), ParamValue::from("2")),
            ("a b".to_string(), ParamValue::from("1")),
            ("a".to_string(), ParamValue::from(true)),
        ]);

        assert_eq!(
            build_param_string(&params).unwrap(),
            "a=true&a%20b=1&a-b=2"
        );
    }

    #[test]
    fn test_param_string_changes_with_values() {
        let mut params = request_params();
        let before = build_param_string(&params).unwrap();
        params.insert("include_entities".to_string(), ParamValue::from(false));
        assert_ne!(before, build_param_string(&params).unwrap());
    }

    #[test]
    fn test_param_string_rejects_non_finite() {
        let params = BTreeMap::from([("ratio".to_string(), ParamValue::from(f64::NAN))]);
        let err = build_param_string(&params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_build_signature_base_string() {
        // Keep lowercase to check the method is uppercased.
        let result = build_signature_base_string("post", URL, PARAM_STRING).unwrap();
        assert_eq!(result, SIG_BASE_STRING);
    }

    #[test]
    fn test_signature_base_string_rejects_query() {
        let err = build_signature_base_string("GET", "https://api.twitter.com/x?y=z", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestMalformed);
    }

    #[test]
    fn test_signature_base_string_rejects_fragment() {
        let err = build_signature_base_string("GET", "https://api.twitter.com/x.json#frag", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestMalformed);
    }

    #[test]
    fn test_build_signing_key() {
        assert_eq!(
            build_signing_key(CONSUMER_SECRET, Some(TOKEN_SECRET)),
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw&LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"
        );
    }

    #[test]
    fn test_build_signing_key_without_token() {
        let key = build_signing_key(CONSUMER_SECRET, None);
        assert_eq!(key, "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw&");
        assert!(key.ends_with('&'));
        assert_ne!(key, build_signing_key(CONSUMER_SECRET, Some("x")));
    }

    #[test]
    fn test_build_signing_key_encodes_components() {
        assert_eq!(build_signing_key("a&b", Some("c d")), "a%26b&c%20d");
    }

    #[test]
    fn test_build_signature() {
        let key = build_signing_key(CONSUMER_SECRET, Some(TOKEN_SECRET));
        assert_eq!(
            build_signature(SIG_BASE_STRING, &key),
            "tnnArxj06cWHq44gCs1OSKk/jLY="
        );
    }

    #[test]
    fn test_build_header_string() {
        assert_eq!(build_header_string(&oauth_params()), HEADER_STRING);
    }

    #[test]
    fn test_header_string_skips_non_protocol_params() {
        let mut params = oauth_params();
        params.insert("status".to_string(), STATUS.to_string());
        assert_eq!(build_header_string(&params), HEADER_STRING);
    }

    fn signer() -> RequestSigner {
        RequestSigner::new().with_overrides(
            Overrides::new()
                .with_nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
                .with_timestamp(1318622958),
        )
    }

    fn status_request() -> OAuthRequest {
        OAuthRequest::new("POST", URL)
            .unwrap()
            .with_param("include_entities", "true")
            .with_param("status", STATUS)
    }

    #[test]
    fn test_sign_with_token() {
        let app = AppCredentials::new("xvz1evFS4wEEPTGEFPHBog", CONSUMER_SECRET);
        let client = ClientCredentials::new(
            1,
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            TOKEN_SECRET,
        );

        let headers = signer()
            .sign_with_token(&status_request(), &app, &client)
            .unwrap();
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[AUTHORIZATION].to_str().unwrap(), HEADER_STRING);
    }

    #[test]
    fn test_sign_rejects_empty_credentials() {
        let req = status_request();

        let err = signer()
            .sign(&req, &AppCredentials::new("", CONSUMER_SECRET))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        let err = signer()
            .sign_with_token(
                &req,
                &AppCredentials::new("key", CONSUMER_SECRET),
                &ClientCredentials::new(1, "", TOKEN_SECRET),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_sign_rejects_colliding_params() {
        let req = status_request().with_param("oauth_nonce", "mine");
        let err = signer()
            .sign(&req, &AppCredentials::new("key", CONSUMER_SECRET))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestMalformed);
    }

    #[test]
    fn test_sign_generates_fresh_nonce() {
        let app = AppCredentials::new("key", CONSUMER_SECRET);
        let signer = RequestSigner::new();
        let a = signer.sign(&status_request(), &app).unwrap();
        let b = signer.sign(&status_request(), &app).unwrap();
        assert_ne!(a[AUTHORIZATION], b[AUTHORIZATION]);
    }
}
