//! 115云盘宽松标量类型
//! Lenient scalar wrappers shared by both API dialects
//!
//! 两套接口对同一个字段的编码并不一致：数字可能带引号，布尔值可能是 0/1，
//! 时间可能是 Unix 秒也可能是 RFC3339，空值可能缺失、为 null 或为空串。

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// 取出标量的原始文本（去掉字符串引号）
///
/// Numbers keep their wire text (`arbitrary_precision`), so `1e3` stays `1e3`.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Timestamp decoded from Unix seconds or RFC3339 / 时间戳
///
/// `None` is the zero time. Encoding always emits Unix seconds, even when the
/// value was decoded from RFC3339.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time(Option<i64>);

impl Time {
    pub fn from_unix(secs: i64) -> Self {
        Self(Some(secs))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// Unix seconds, 0 for the zero time
    pub fn unix(&self) -> i64 {
        self.0.unwrap_or(0)
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.0.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Parse the unquoted text of a timestamp
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim_matches('"');
        if text.is_empty() || text == "null" {
            return Ok(Self::default());
        }
        match text.parse::<i64>() {
            Ok(secs) => Ok(Self(Some(secs))),
            Err(int_err) => match DateTime::parse_from_rfc3339(text) {
                Ok(dt) => Ok(Self(Some(dt.with_timezone(&Utc).timestamp()))),
                Err(_) => Err(format!("invalid timestamp '{}': {}", text, int_err)),
            },
        }
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(Some(dt.timestamp()))
    }
}

/// `deserialize_with` helper: unparseable timestamps become the zero time
pub fn lenient_time<'de, D>(deserializer: D) -> Result<Time, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Time::parse(&scalar_text(&value)).unwrap_or_else(|e| {
        tracing::debug!("115: lenient timestamp fallback to zero: {}", e);
        Time::default()
    }))
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Time::parse(&scalar_text(&value)).map_err(D::Error::custom)
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.unix())
    }
}

/// 32-bit integer, quoted or not / 32位整数
///
/// Malformed input decodes to 0 instead of failing the whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(pub i32);

/// 64-bit integer, quoted or not / 64位整数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int64(pub i64);

macro_rules! lenient_int {
    ($name:ident, $inner:ty) => {
        impl $name {
            pub fn get(&self) -> $inner {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == 0
            }

            /// 解析失败时返回 0
            pub fn parse(text: &str) -> Self {
                let text = text.trim_matches('"');
                let text = if text.is_empty() { "0" } else { text };
                match text.parse::<$inner>() {
                    Ok(v) => Self(v),
                    Err(e) => {
                        tracing::debug!("115: lenient {} fallback to 0 for '{}': {}", stringify!($name), text, e);
                        Self(0)
                    }
                }
            }
        }

        impl From<$inner> for $name {
            fn from(v: $inner) -> Self {
                Self(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = Value::deserialize(deserializer)?;
                Ok(Self::parse(&scalar_text(&value)))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }
    };
}

lenient_int!(Int, i32);
lenient_int!(Int64, i64);

/// Boolean sent either as `true`/`false` or as `1`/`0` / 布尔或整数
///
/// Unlike the other scalars this one rejects unknown shapes: a quoted or
/// fractional value here means the remote changed its encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoolOrInt(pub bool);

impl BoolOrInt {
    pub fn get(&self) -> bool {
        self.0
    }
}

impl From<bool> for BoolOrInt {
    fn from(v: bool) -> Self {
        Self(v)
    }
}

impl<'de> Deserialize<'de> for BoolOrInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self(false)),
            Value::Bool(b) => Ok(Self(b)),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Self(n.as_i64() == Some(1))),
            other => Err(D::Error::custom(format!(
                "expected a boolean or an integer, got {}",
                other
            ))),
        }
    }
}

impl Serialize for BoolOrInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.0)
    }
}

/// String that also accepts unquoted tokens / 宽松字符串
///
/// Numbers, booleans and nested values keep their JSON text verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LenientString(pub String);

impl LenientString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for LenientString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for LenientString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LenientString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(scalar_text(&value)))
    }
}

impl Serialize for LenientString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
