//! 115云盘响应归一化
//! 同时兼容Cookie接口与开放平台接口，解析为统一的文件、直链、上传会话与凭证

mod config;
mod download;
mod envelope;
mod error;
mod oss;
mod response;
mod scalar;
mod types;
mod upload;

pub use config::Pan115Config;
pub use download::{link_valid, DownloadInfo, DownloadUrl, SessionCookie};
pub use envelope::{Envelope, OpenApiBase, TraditionalBase};
pub use error::{AuthError, Dialect, Pan115Error, Result};
pub use oss::{OssToken, OssTokenResp};
pub use response::{
    check_response, decode, decode_value, ApiResponse, ListResponse, OpenApiDownloadResp,
    OpenApiFileResp, OpenApiListResp, TraditionalDownloadResp, TraditionalListResp,
    TraditionalMkdirResp,
};
pub use scalar::{BoolOrInt, Int, Int64, LenientString, Time};
pub use types::{File, PathNode};
pub use upload::{
    ensure_base64, Callback, CallbackPayload, UploadInitData, UploadInitInfo, STATUS_INSTANT,
    STATUS_SIGN_CHECK,
};
