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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used to load credentials.
pub const TWITTER_APP_KEY: &str = "TWITTER_APP_KEY";
pub const TWITTER_APP_SECRET: &str = "TWITTER_APP_SECRET";
pub const TWITTER_USER_ID: &str = "TWITTER_USER_ID";
pub const TWITTER_USER_TOKEN: &str = "TWITTER_USER_TOKEN";
pub const TWITTER_USER_SECRET: &str = "TWITTER_USER_SECRET";
pub const TWITTER_CALLBACK_URL: &str = "TWITTER_CALLBACK_URL";

// Protocol parameters defined by RFC 5849.
pub const OAUTH_CALLBACK: &str = "oauth_callback";
pub const OAUTH_CALLBACK_CONFIRMED: &str = "oauth_callback_confirmed";
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_NONCE: &str = "oauth_nonce";
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
pub const OAUTH_TOKEN: &str = "oauth_token";
pub const OAUTH_TOKEN_SECRET: &str = "oauth_token_secret";
pub const OAUTH_VERIFIER: &str = "oauth_verifier";
pub const OAUTH_VERSION: &str = "oauth_version";

// Keys of the persisted client credential mapping, also returned by the
// access token endpoint.
pub const USER_ID: &str = "user_id";
pub const TOKEN: &str = "token";
pub const SECRET: &str = "secret";

pub const SIGNATURE_METHOD_HMAC_SHA1: &str = "HMAC-SHA1";
pub const OAUTH_VERSION_1_0: &str = "1.0";

/// Default length of a generated `oauth_nonce`.
pub const DEFAULT_NONCE_LENGTH: usize = 32;

// Endpoints of the Twitter three-legged flow.
pub const TWITTER_REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
pub const TWITTER_AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
pub const TWITTER_AUTHENTICATE_URL: &str = "https://api.twitter.com/oauth/authenticate";
pub const TWITTER_ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";

/// AsciiSet for [RFC 3986 percent encoding](https://datatracker.ietf.org/doc/html/rfc5849#section-3.6)
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static OAUTH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
