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

//! Utility functions and types.

use std::fmt::{Debug, Display, Formatter};

/// The placeholder written in place of a secret.
pub const SECRET_MASK: &str = "******";

/// Redacts a string for logging.
///
/// - [`Redact::partial`] (the default used by `From`) keeps the first and last
///   three characters of values with 12 or more characters and writes `***`
///   for shorter ones, so different keys stay distinguishable in logs.
/// - [`Redact::full`] always writes [`SECRET_MASK`], for secrets that must not
///   leak a single character.
pub struct Redact<'a> {
    value: &'a str,
    full: bool,
}

impl<'a> Redact<'a> {
    /// Redact all but the first and last three characters.
    pub fn partial(value: &'a str) -> Self {
        Self { value, full: false }
    }

    /// Redact the whole value.
    pub fn full(value: &'a str) -> Self {
        Self { value, full: true }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact::partial(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::partial(value.as_str())
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let length = self.value.len();
        if self.full {
            f.write_str(SECRET_MASK)
        } else if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.value.is_char_boundary(3) {
            f.write_str("***")
        } else if !self.value.is_char_boundary(length - 3) {
            f.write_str("***")
        } else {
            f.write_str(&self.value[..3])?;
            f.write_str("***")?;
            f.write_str(&self.value[length - 3..])
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
