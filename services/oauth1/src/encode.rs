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

//! RFC 3986 percent encoding of request parameters.

use crate::constants::OAUTH_ENCODE_SET;
use oauthsign_core::{Error, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;

/// A scalar value carried by a request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A text value, encoded as is.
    Str(String),
    /// A signed integer, encoded in decimal.
    Int(i64),
    /// An unsigned integer, encoded in decimal.
    UInt(u64),
    /// A floating point number, encoded with the shortest digits that round
    /// trip. Values with a decimal exponent in `-4..16` are written plainly and
    /// always keep a fractional part (`1.0`, `0.0001`). Others use scientific
    /// notation with a signed, two digit exponent (`1e+16`, `1.5e-07`).
    /// Non-finite values can't be encoded.
    Float(f64),
    /// A boolean, encoded as `true` or `false`.
    Bool(bool),
}

impl ParamValue {
    /// Render the value in its canonical string form, before percent encoding.
    pub fn to_canonical_string(&self) -> Result<Cow<'_, str>> {
        let s = match self {
            ParamValue::Str(v) => Cow::Borrowed(v.as_str()),
            ParamValue::Int(v) => Cow::Owned(v.to_string()),
            ParamValue::UInt(v) => Cow::Owned(v.to_string()),
            ParamValue::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            ParamValue::Float(v) => {
                if !v.is_finite() {
                    return Err(Error::encoding(format!(
                        "float value {v} has no canonical decimal form"
                    )));
                }

                Cow::Owned(format_float(*v))
            }
        };

        Ok(s)
    }
}

fn format_float(v: f64) -> String {
    // `{:e}` gives the shortest round-trip digits, e.g. `1.5e-7`.
    let sci = format!("{v:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or_default()),
        None => (sci.as_str(), 0),
    };

    if (-4..16).contains(&exp) {
        let mut s = v.to_string();
        // `1.0` is displayed as `1`, keep the fractional part.
        if !s.contains('.') {
            s.push_str(".0");
        }
        return s;
    }

    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Str(v.clone())
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::UInt(v.into())
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::UInt(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// Percent encode a string with the OAuth encode set.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, &OAUTH_ENCODE_SET).to_string()
}

/// Percent encode a parameter value.
pub fn encode_value(v: &ParamValue) -> Result<String> {
    Ok(percent_encode(&v.to_canonical_string()?))
}

/// Decode a percent encoded string back into UTF-8.
pub fn percent_decode(s: &str) -> Result<String> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| Error::encoding("percent decoded value is not valid utf-8").with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauthsign_core::ErrorKind;
    use test_case::test_case;

    #[test_case(ParamValue::from(1i32), "1"; "int")]
    #[test_case(ParamValue::from(-42i64), "-42"; "negative int")]
    #[test_case(ParamValue::from(1.0), "1.0"; "float without fraction")]
    #[test_case(ParamValue::from(0.25), "0.25"; "float with fraction")]
    #[test_case(ParamValue::from(0.0001), "0.0001"; "small float")]
    #[test_case(ParamValue::from(1e15), "1000000000000000.0"; "large float")]
    #[test_case(ParamValue::from(1e16), "1e%2B16"; "float with positive exponent")]
    #[test_case(ParamValue::from(1.5e-7), "1.5e-07"; "float with negative exponent")]
    #[test_case(ParamValue::from(-1.2345678901234568e17), "-1.2345678901234568e%2B17"; "negative float with exponent")]
    #[test_case(ParamValue::from(1e100), "1e%2B100"; "float with three digit exponent")]
    #[test_case(ParamValue::from(true), "true"; "bool true")]
    #[test_case(ParamValue::from(false), "false"; "bool false")]
    #[test_case(ParamValue::from("hello/world"), "hello%2Fworld"; "slash")]
    #[test_case(ParamValue::from("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen"; "space and plus")]
    #[test_case(ParamValue::from("a-b.c_d~e"), "a-b.c_d~e"; "unreserved kept")]
    #[test_case(ParamValue::from("☃"), "%E2%98%83"; "multibyte")]
    fn test_encode_value(input: ParamValue, expected: &str) {
        assert_eq!(encode_value(&input).unwrap(), expected);
    }

    #[test]
    fn test_encode_non_finite_float() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode_value(&ParamValue::from(v)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Encoding);
        }
    }

    #[test]
    fn test_encode_is_not_applied_twice_to_safe_chars() {
        let once = percent_encode("abcXYZ019-._~");
        assert_eq!(once, percent_encode(&once));
    }

    #[test]
    fn test_decode_restores_canonical_string() {
        let values = [
            ParamValue::from("Hello Ladies + Gentlemen, a signed OAuth request!"),
            ParamValue::from("http://localhost/sign-in-with-twitter/"),
            ParamValue::from("%2F already encoded"),
            ParamValue::from("ünïcödé & = ?"),
            ParamValue::from(12345u64),
            ParamValue::from(3.5),
            ParamValue::from(true),
        ];

        for v in values {
            let encoded = encode_value(&v).unwrap();
            assert_eq!(
                percent_decode(&encoded).unwrap(),
                v.to_canonical_string().unwrap()
            );
        }
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = percent_decode("%FF%FE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }
}
