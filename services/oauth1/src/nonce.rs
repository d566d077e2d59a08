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

use oauthsign_core::time::{now, unix_timestamp};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a random alphanumeric nonce of given length.
///
/// `thread_rng` is a CSPRNG seeded from the operating system, so two nonces
/// won't collide in practice.
pub fn generate_nonce(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Current Unix time in seconds.
pub fn generate_timestamp() -> i64 {
    unix_timestamp(now())
}
