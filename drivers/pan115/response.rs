//! 115云盘响应结构
//! Dialect-specific response records and the byte-level entry points

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::download::{DownloadInfo, DownloadUrl};
use super::envelope::{Envelope, OpenApiBase, TraditionalBase};
use super::error::{Dialect, Pan115Error, Result};
use super::scalar::{Int, Int64, LenientString};
use super::types::{File, PathNode};

/// Envelope plus a `data` payload / 通用响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(bound(deserialize = "B: Deserialize<'de> + Default, T: Deserialize<'de> + Default"))]
pub struct ApiResponse<B, T> {
    #[serde(flatten)]
    pub base: B,
    #[serde(default)]
    pub data: T,
}

impl<B: Envelope, T> ApiResponse<B, T> {
    /// Payload if the envelope reports success
    pub fn into_result(self) -> Result<T> {
        self.base.err()?;
        Ok(self.data)
    }
}

/// Directory listing, same layout in both dialects / 文件列表响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(bound(deserialize = "B: Deserialize<'de> + Default"))]
pub struct ListResponse<B> {
    #[serde(flatten)]
    pub base: B,
    #[serde(default)]
    pub data: Vec<File>,
    #[serde(default)]
    pub count: Int64,
    #[serde(default)]
    pub offset: Int64,
    #[serde(default)]
    pub limit: Int64,
    #[serde(default)]
    pub cid: LenientString,
    #[serde(default)]
    pub path: Vec<PathNode>,
}

impl<B: Envelope> ListResponse<B> {
    pub fn into_files(self) -> Result<Vec<File>> {
        self.base.err()?;
        Ok(self.data)
    }

    /// More entries remain after this page / 是否还有下一页
    pub fn has_more(&self) -> bool {
        self.offset.get().saturating_add(self.data.len() as i64) < self.count.get()
    }
}

pub type TraditionalListResp = ListResponse<TraditionalBase>;
pub type OpenApiListResp = ListResponse<OpenApiBase>;

/// Folder detail on the open platform / 开放平台文件详情
pub type OpenApiFileResp = ApiResponse<OpenApiBase, File>;

/// Download links keyed by file id / 开放平台下载响应
pub type OpenApiDownloadResp = ApiResponse<OpenApiBase, HashMap<String, DownloadInfo>>;

/// Web download response of the cookie API / 传统接口下载响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TraditionalDownloadResp {
    #[serde(flatten)]
    pub base: TraditionalBase,
    #[serde(default)]
    pub file_url: DownloadUrl,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: Int64,
    #[serde(default)]
    pub pickcode: String,
    #[serde(default)]
    pub file_id: LenientString,
}

impl TraditionalDownloadResp {
    pub fn into_info(self) -> Result<DownloadInfo> {
        self.base.err()?;
        Ok(DownloadInfo {
            file_name: self.file_name,
            file_size: self.file_size,
            pick_code: self.pickcode,
            sha1: String::new(),
            url: self.file_url,
        })
    }
}

/// Folder creation result, cookie API / 新建文件夹响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TraditionalMkdirResp {
    #[serde(flatten)]
    pub base: TraditionalBase,
    #[serde(default)]
    pub cid: LenientString,
    #[serde(default)]
    pub cname: String,
    #[serde(default)]
    pub aid: Int,
}

fn shape_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Decode raw response bytes / 解析响应字节
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_value(value)
}

/// Decode an already parsed response
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| Pan115Error::Shape {
        what: shape_name::<T>(),
        source,
    })
}

/// Check only the envelope of a response / 仅检查响应状态
pub fn check_response(dialect: Dialect, bytes: &[u8]) -> Result<()> {
    match dialect {
        Dialect::Traditional => decode::<TraditionalBase>(bytes)?.err(),
        Dialect::OpenApi => decode::<OpenApiBase>(bytes)?.err(),
    }
}
