//! 115云盘配置

use serde::{Deserialize, Serialize};

use super::error::Dialect;

const DEFAULT_PAGE_SIZE: i64 = 1000;

/// 115云盘配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pan115Config {
    /// 开放平台访问令牌
    #[serde(default)]
    pub access_token: String,

    /// 开放平台刷新令牌
    #[serde(default)]
    pub refresh_token: String,

    /// 每页数量
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pan115Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_token: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pan115Config {
    /// 有令牌时走开放平台接口，否则走Cookie接口
    pub fn dialect(&self) -> Dialect {
        if self.access_token.is_empty() && self.refresh_token.is_empty() {
            Dialect::Traditional
        } else {
            Dialect::OpenApi
        }
    }

    pub fn effective_page_size(&self) -> i64 {
        if self.page_size > 0 {
            self.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }
}
