//! 115云盘响应基础字段
//! Success/failure envelopes embedded in every response
//!
//! The two dialects keep their own struct each: field names and precedence
//! differ, only the method names are shared through [`Envelope`].

use serde::{Deserialize, Serialize};

use super::error::{AuthError, Dialect, Pan115Error};
use super::scalar::{BoolOrInt, Int, LenientString};

/// Access token expired or malformed, a refresh can recover / 访问令牌失效
const ACCESS_TOKEN_CODES: std::ops::RangeInclusive<i32> = 40140123..=40140126;
/// Refresh token itself rejected, re-login required / 刷新令牌失效
const REFRESH_TOKEN_CODES: std::ops::RangeInclusive<i32> = 40140116..=40140119;

pub trait Envelope {
    const DIALECT: Dialect;

    fn is_ok(&self) -> bool;

    /// First non-zero code of the redundant pair
    fn err_code(&self) -> i32;

    /// First non-empty message of the redundant pair
    fn err_msg(&self) -> &str;

    fn err(&self) -> Result<(), Pan115Error> {
        if self.is_ok() {
            return Ok(());
        }
        Err(Pan115Error::Api {
            dialect: Self::DIALECT,
            code: self.err_code(),
            message: self.err_msg().to_string(),
        })
    }
}

/// Cookie API envelope / 传统接口基础响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TraditionalBase {
    #[serde(default)]
    pub state: BoolOrInt,
    #[serde(default)]
    pub errno: Int,
    #[serde(default, rename = "errNo")]
    pub err_no: Int,
    #[serde(default)]
    pub error: LenientString,
    #[serde(default)]
    pub msg: LenientString,
}

impl Envelope for TraditionalBase {
    const DIALECT: Dialect = Dialect::Traditional;

    fn is_ok(&self) -> bool {
        self.state.get()
    }

    fn err_code(&self) -> i32 {
        if !self.errno.is_zero() {
            self.errno.get()
        } else {
            self.err_no.get()
        }
    }

    fn err_msg(&self) -> &str {
        if !self.error.is_empty() {
            self.error.as_str()
        } else {
            self.msg.as_str()
        }
    }
}

/// Open platform envelope / 开放平台基础响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenApiBase {
    #[serde(default)]
    pub state: BoolOrInt,
    #[serde(default)]
    pub code: Int,
    #[serde(default)]
    pub message: LenientString,
    #[serde(default)]
    pub error: LenientString,
    #[serde(default)]
    pub errno: Int,
}

impl OpenApiBase {
    /// Token failure carried by this envelope, if any / 识别令牌失效
    pub fn auth_error(&self) -> Option<AuthError> {
        if self.is_ok() {
            return None;
        }
        let code = self.err_code();
        let refresh_token_invalid = if REFRESH_TOKEN_CODES.contains(&code) {
            true
        } else if ACCESS_TOKEN_CODES.contains(&code) {
            false
        } else {
            return None;
        };
        Some(AuthError {
            code,
            message: self.err_msg().to_string(),
            refresh_token_invalid,
        })
    }
}

impl Envelope for OpenApiBase {
    const DIALECT: Dialect = Dialect::OpenApi;

    fn is_ok(&self) -> bool {
        self.state.get()
    }

    fn err_code(&self) -> i32 {
        if !self.code.is_zero() {
            self.code.get()
        } else {
            self.errno.get()
        }
    }

    fn err_msg(&self) -> &str {
        if !self.message.is_empty() {
            self.message.as_str()
        } else {
            self.error.as_str()
        }
    }

    fn err(&self) -> Result<(), Pan115Error> {
        if self.is_ok() {
            return Ok(());
        }
        if let Some(auth) = self.auth_error() {
            return Err(auth.into());
        }
        Err(Pan115Error::Api {
            dialect: Self::DIALECT,
            code: self.err_code(),
            message: self.err_msg().to_string(),
        })
    }
}
