//! 115云盘上传初始化
//! Upload handshake in its flat (cookie) and nested (open platform) forms

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::envelope::{Envelope, OpenApiBase};
use super::error::{Dialect, Pan115Error};
use super::scalar::{Int, LenientString};

/// Upload already satisfied by content on the server / 秒传成功
pub const STATUS_INSTANT: i32 = 2;
/// Server asks for a range hash before continuing / 需要二次校验
pub const STATUS_SIGN_CHECK: i32 = 7;

/// Outcome of resolving an OSS callback payload / 回调解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CallbackPayload {
    Resolved {
        callback: String,
        callback_var: String,
    },
    #[default]
    Unresolved,
}

impl CallbackPayload {
    /// Try object, then two-element array, then the raw text / 依次尝试对象、数组、原文
    pub fn resolve(raw: &Value) -> Self {
        let raw_text = match raw {
            Value::Null => return CallbackPayload::Unresolved,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if raw_text.is_empty() {
            return CallbackPayload::Unresolved;
        }

        let (callback, callback_var) = match raw {
            Value::Object(map) => (member_str(map.get("callback")), member_str(map.get("callback_var"))),
            _ => (String::new(), String::new()),
        };
        if !callback.is_empty() {
            return Self::encoded(&callback, &callback_var);
        }

        if let Value::Array(items) = raw {
            let callback = member_str(items.first());
            if !callback.is_empty() {
                return Self::encoded(&callback, &member_str(items.get(1)));
            }
        }

        tracing::debug!("115: upload callback kept verbatim");
        Self::encoded(&raw_text, "")
    }

    fn encoded(callback: &str, callback_var: &str) -> Self {
        CallbackPayload::Resolved {
            callback: ensure_base64(callback),
            callback_var: if callback_var.is_empty() {
                String::new()
            } else {
                ensure_base64(callback_var)
            },
        }
    }

    pub fn callback(&self) -> Option<&str> {
        match self {
            CallbackPayload::Resolved { callback, .. } => Some(callback),
            CallbackPayload::Unresolved => None,
        }
    }

    pub fn callback_var(&self) -> Option<&str> {
        match self {
            CallbackPayload::Resolved { callback_var, .. } if !callback_var.is_empty() => Some(callback_var),
            _ => None,
        }
    }
}

fn member_str(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Base64 text safe to put into an OSS callback parameter
pub fn ensure_base64(s: &str) -> String {
    if BASE64.decode(s).is_ok() {
        s.to_string()
    } else {
        BASE64.encode(s)
    }
}

/// Callback field of an upload handshake, resolved while decoding / 上传回调
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Callback(pub CallbackPayload);

impl<'de> Deserialize<'de> for Callback {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Callback(CallbackPayload::resolve(&raw)))
    }
}

impl Serialize for Callback {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.0 {
            CallbackPayload::Resolved { callback, callback_var } => {
                serde_json::json!({ "callback": callback, "callback_var": callback_var }).serialize(serializer)
            }
            CallbackPayload::Unresolved => serializer.serialize_none(),
        }
    }
}

/// Nested open platform payload / 开放平台上传数据
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadInitData {
    #[serde(default)]
    pub pick_code: String,
    #[serde(default)]
    pub status: Int,
    #[serde(default)]
    pub sign_key: String,
    #[serde(default)]
    pub sign_check: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub callback: Callback,
    #[serde(default)]
    pub file_id: LenientString,
    #[serde(default)]
    pub target: String,
}

/// Upload handshake response / 上传初始化响应
///
/// When `data` is present the open platform shape is authoritative, otherwise
/// the flat cookie fields are.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadInitInfo {
    #[serde(flatten)]
    pub base: OpenApiBase,
    #[serde(default)]
    pub request: String,
    #[serde(default)]
    pub statuscode: Int,
    #[serde(default)]
    pub statusmsg: String,
    #[serde(default)]
    pub pickcode: String,
    #[serde(default)]
    pub status: Int,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub sign_key: String,
    #[serde(default)]
    pub sign_check: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub callback: Callback,
    #[serde(default)]
    pub file_id: LenientString,
    #[serde(default)]
    pub data: Option<UploadInitData>,
}

fn pick<'a>(nested: Option<&'a str>, flat: &'a str) -> &'a str {
    match nested {
        Some(v) if !v.is_empty() => v,
        _ => flat,
    }
}

impl UploadInitInfo {
    pub fn dialect(&self) -> Dialect {
        if self.data.is_some() {
            Dialect::OpenApi
        } else {
            Dialect::Traditional
        }
    }

    pub fn get_pick_code(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.pick_code.as_str()), &self.pickcode)
    }

    pub fn get_status(&self) -> i32 {
        match &self.data {
            Some(d) if !d.status.is_zero() => d.status.get(),
            _ => self.status.get(),
        }
    }

    pub fn get_file_id(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.file_id.as_str()), self.file_id.as_str())
    }

    pub fn get_sign_key(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.sign_key.as_str()), &self.sign_key)
    }

    pub fn get_sign_check(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.sign_check.as_str()), &self.sign_check)
    }

    pub fn get_bucket(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.bucket.as_str()), &self.bucket)
    }

    pub fn get_object(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.object.as_str()), &self.object)
    }

    pub fn get_target(&self) -> &str {
        pick(self.data.as_ref().map(|d| d.target.as_str()), &self.target)
    }

    fn callback_payload(&self) -> &CallbackPayload {
        match &self.data {
            Some(d) if d.callback.0 != CallbackPayload::Unresolved => &d.callback.0,
            _ => &self.callback.0,
        }
    }

    /// Base64 callback for the OSS multipart upload, empty if none
    pub fn get_callback(&self) -> &str {
        self.callback_payload().callback().unwrap_or_default()
    }

    pub fn get_callback_var(&self) -> &str {
        self.callback_payload().callback_var().unwrap_or_default()
    }

    /// 秒传
    pub fn is_instant(&self) -> bool {
        self.get_status() == STATUS_INSTANT
    }

    pub fn need_sign_check(&self) -> bool {
        self.get_status() == STATUS_SIGN_CHECK
    }

    /// Failure reported by whichever shape answered / 检查初始化结果
    pub fn err(&self) -> Result<(), Pan115Error> {
        if self.data.is_some() {
            return self.base.err();
        }
        if self.status.is_zero() && !self.statuscode.is_zero() {
            return Err(Pan115Error::Api {
                dialect: Dialect::Traditional,
                code: self.statuscode.get(),
                message: self.statusmsg.clone(),
            });
        }
        Ok(())
    }
}
