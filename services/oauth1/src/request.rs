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

use crate::encode::{encode_value, percent_encode, ParamValue};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Uri};
use oauthsign_core::{Error, Result};
use std::collections::BTreeMap;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// OAuthRequest describes one API call to sign: method, base url and the
/// request parameters.
///
/// The url must not carry a query or a fragment. Parameters that would travel in the query
/// string or in a form encoded body are given through [`OAuthRequest::with_param`]
/// instead, so that they take part in the signature.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthRequest {
    method: Method,
    url: String,
    params: BTreeMap<String, ParamValue>,
}

impl OAuthRequest {
    /// Create a new request.
    ///
    /// The method is normalized to uppercase. Returns a malformed request error
    /// if the url is not absolute or carries a query or a fragment.
    pub fn new(method: &str, url: &str) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;

        let uri: Uri = url.parse()?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::request_malformed(format!(
                "url {url} must be absolute"
            )));
        }
        if uri.query().is_some() {
            return Err(Error::request_malformed(format!(
                "url {url} must not carry a query, pass parameters separately"
            )));
        }
        if url.contains('#') {
            return Err(Error::request_malformed(format!(
                "url {url} must not carry a fragment"
            )));
        }

        Ok(Self {
            method,
            url: url.to_string(),
            params: BTreeMap::new(),
        })
    }

    /// Set a request parameter, replacing any previous value for this name.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set many request parameters.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// HTTP method, always uppercase.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Base url without query.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request parameters sorted by name.
    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    /// Whether the parameters travel in the query string instead of a form body.
    fn params_in_query(&self) -> bool {
        matches!(self.method, Method::GET | Method::HEAD | Method::DELETE)
    }

    /// Encode the parameters as `k=v&k=v`, using the same percent encoding as
    /// the signature.
    pub fn encoded_params(&self) -> Result<String> {
        let mut s = String::new();
        for (idx, (k, v)) in self.params.iter().enumerate() {
            if idx != 0 {
                s.push('&');
            }
            s.push_str(&percent_encode(k));
            s.push('=');
            s.push_str(&encode_value(v)?);
        }

        Ok(s)
    }

    /// Build the unsent http request, with the given headers attached.
    ///
    /// `GET`, `HEAD` and `DELETE` carry the parameters in the query string,
    /// other methods in an `application/x-www-form-urlencoded` body.
    pub fn to_http_request(&self, headers: HeaderMap) -> Result<http::Request<Bytes>> {
        let encoded = self.encoded_params()?;

        let (uri, body) = if encoded.is_empty() {
            (self.url.clone(), Bytes::new())
        } else if self.params_in_query() {
            (format!("{}?{}", self.url, encoded), Bytes::new())
        } else {
            (self.url.clone(), Bytes::from(encoded))
        };

        let mut req = http::Request::builder()
            .method(self.method.clone())
            .uri(uri)
            .body(body)?;

        *req.headers_mut() = headers;
        if !self.params_in_query() && !self.params.is_empty() {
            req.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        }

        Ok(req)
    }
}
