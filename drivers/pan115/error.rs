//! 115云盘错误类型
//! Error taxonomy for decoded 115 responses

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which API convention produced a response / 接口风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Cookie-based web API / 传统Cookie接口
    #[default]
    Traditional,
    /// Token-based open platform API / 开放平台接口
    OpenApi,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Traditional => f.write_str("traditional"),
            Dialect::OpenApi => f.write_str("openapi"),
        }
    }
}

fn api_error_text(dialect: &Dialect, code: &i32, message: &str) -> String {
    if message.is_empty() {
        format!("115 {} api error: code {}", dialect, code)
    } else {
        format!("115 {} api error: code {}, {}", dialect, code, message)
    }
}

/// Token rejected by the open platform / 授权失效
///
/// `refresh_token_invalid` tells the caller whether refreshing can still help
/// or the user has to log in again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("115 openapi auth error: code {code}, {message} (refresh token invalid: {refresh_token_invalid})")]
pub struct AuthError {
    pub code: i32,
    pub message: String,
    pub refresh_token_invalid: bool,
}

#[derive(Debug, Error)]
pub enum Pan115Error {
    /// Envelope reported failure / 接口返回失败
    #[error("{}", api_error_text(.dialect, .code, .message))]
    Api {
        dialect: Dialect,
        code: i32,
        message: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Payload matched none of the accepted shapes / 响应结构无法识别
    #[error("unexpected shape for {what}: {source}")]
    Shape {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Pan115Error {
    pub fn code(&self) -> Option<i32> {
        match self {
            Pan115Error::Api { code, .. } => Some(*code),
            Pan115Error::Auth(e) => Some(e.code),
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Pan115Error::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, Pan115Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_text() {
        let err = Pan115Error::Api {
            dialect: Dialect::Traditional,
            code: 20004,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "115 traditional api error: code 20004, not found");

        let err = Pan115Error::Api {
            dialect: Dialect::OpenApi,
            code: 990001,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "115 openapi api error: code 990001");
        assert_eq!(err.code(), Some(990001));
        assert!(!err.is_auth());
    }

    #[test]
    fn test_auth_error_converts() {
        let err: Pan115Error = AuthError {
            code: 40140116,
            message: "refresh token invalid".to_string(),
            refresh_token_invalid: true,
        }
        .into();
        assert!(err.is_auth());
        assert_eq!(err.code(), Some(40140116));
        assert!(err.to_string().contains("40140116"));
    }
}
