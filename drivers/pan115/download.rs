//! 115云盘下载直链
//! Download links and their expiry

use chrono::{DateTime, Duration, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use super::scalar::{Int, Int64};

/// Links are treated as expired this long before the remote deadline
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Cookie the transport received together with a link / 下载会话Cookie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
struct LinkObject {
    #[serde(default)]
    url: String,
    #[serde(default)]
    client: Int,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    oss_id: String,
}

/// Direct download link / 下载直链
///
/// Arrives as `{url, client, desc, oss_id}`, as a bare URL string, or as the
/// literal `false` when the remote has no link to give.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadUrl {
    pub url: String,
    pub client: Int,
    pub desc: String,
    pub oss_id: String,
    #[serde(skip)]
    pub cookies: Vec<SessionCookie>,
}

impl<'de> Deserialize<'de> for DownloadUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(false) | Value::Null => Ok(Self::default()),
            Value::Object(map) => {
                let link: LinkObject =
                    serde_json::from_value(Value::Object(map)).map_err(D::Error::custom)?;
                Ok(Self {
                    url: link.url,
                    client: link.client,
                    desc: link.desc,
                    oss_id: link.oss_id,
                    cookies: Vec::new(),
                })
            }
            Value::String(url) => Ok(Self {
                url,
                ..Default::default()
            }),
            other => Err(D::Error::custom(format!(
                "expected a link object, a url string or false, got {}",
                other
            ))),
        }
    }
}

impl DownloadUrl {
    /// Attach cookies from the response that produced this link
    pub fn with_cookies(mut self, cookies: Vec<SessionCookie>) -> Self {
        self.cookies = cookies;
        self
    }

    /// `name=value;` pairs for follow-up range requests / 拼接Cookie请求头
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={};", c.name, c.value))
            .collect()
    }

    /// Expiry from the `t` query parameter, else `Expires` / 过期时间
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        let parsed = Url::parse(&self.url).ok()?;
        let lookup = |key: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };
        let raw = lookup("t").or_else(|| lookup("Expires"))?;
        match raw.parse::<i64>() {
            Ok(secs) => DateTime::from_timestamp(secs, 0),
            Err(e) => {
                tracing::debug!("115: ignoring unparseable link expiry '{}': {}", raw, e);
                None
            }
        }
    }

    pub fn valid(&self) -> bool {
        self.valid_at(Utc::now())
    }

    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.url.is_empty() {
            return false;
        }
        match self.expiry() {
            Some(expiry) => expiry
                .checked_sub_signed(Duration::seconds(EXPIRY_MARGIN_SECS))
                .map_or(false, |deadline| deadline > now),
            None => true,
        }
    }
}

/// Validity check that also accepts a missing link
pub fn link_valid(link: Option<&DownloadUrl>) -> bool {
    link.map_or(false, DownloadUrl::valid)
}

/// One entry of a download response / 下载信息
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: Int64,
    #[serde(default)]
    pub pick_code: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub url: DownloadUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_link_expiry() {
        let now = Utc::now().timestamp();
        let json = format!(r#"{{"url":"https://cdn.115.com/y?t={}&sign=x"}}"#, now + 3600);
        let link: DownloadUrl = serde_json::from_str(&json).unwrap();
        assert!(link.valid());
        assert_eq!(link.expiry().unwrap().timestamp(), now + 3600);

        let json = format!(r#"{{"url":"https://cdn.115.com/y?t={}"}}"#, now - 10);
        let link: DownloadUrl = serde_json::from_str(&json).unwrap();
        assert!(!link.valid());
    }

    #[test]
    fn test_expiry_margin() {
        let now = Utc::now();
        let json = format!(r#"{{"url":"https://cdn.115.com/y?t={}"}}"#, now.timestamp() + 30);
        let link: DownloadUrl = serde_json::from_str(&json).unwrap();
        assert!(!link.valid_at(now));
    }

    #[test]
    fn test_expires_parameter() {
        let link: DownloadUrl =
            serde_json::from_str(r#""https://oss.example.com/obj?Expires=1700000000&OSSAccessKeyId=k""#).unwrap();
        assert_eq!(link.expiry().unwrap().timestamp(), 1700000000);
        assert!(link.valid_at(DateTime::from_timestamp(1699990000, 0).unwrap()));
        assert!(!link.valid_at(DateTime::from_timestamp(1700000000, 0).unwrap()));
    }

    #[test]
    fn test_expiry_at_calendar_floor() {
        let floor = DateTime::<Utc>::MIN_UTC.timestamp();
        let json = format!(r#""https://cdn.115.com/f?t={}""#, floor);
        let link: DownloadUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(link.expiry().unwrap().timestamp(), floor);
        assert!(!link.valid());
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link: DownloadUrl = serde_json::from_str(r#"{"url":"https://cdn.115.com/file","client":"1"}"#).unwrap();
        assert!(link.expiry().is_none());
        assert!(link.valid());
        assert_eq!(link.client, Int(1));

        let link: DownloadUrl = serde_json::from_str(r#"{"url":"https://cdn.115.com/f?t=soon"}"#).unwrap();
        assert!(link.valid());
    }

    #[test]
    fn test_false_and_empty() {
        let link: DownloadUrl = serde_json::from_str("false").unwrap();
        assert!(!link.valid());
        assert!(link.url.is_empty());

        let link: DownloadUrl = serde_json::from_str("{}").unwrap();
        assert!(!link.valid());
        assert!(!link_valid(None));
    }

    #[test]
    fn test_bad_shapes() {
        assert!(serde_json::from_str::<DownloadUrl>("true").is_err());
        assert!(serde_json::from_str::<DownloadUrl>("12").is_err());
        assert!(serde_json::from_str::<DownloadUrl>("[]").is_err());
        assert!(serde_json::from_str::<DownloadUrl>(r#"{"url":["x"]}"#).is_err());
    }

    #[test]
    fn test_cookie_header() {
        let link = DownloadUrl {
            url: "https://cdn.115.com/f".to_string(),
            ..Default::default()
        }
        .with_cookies(vec![
            SessionCookie { name: "acw_tc".to_string(), value: "abc".to_string() },
            SessionCookie { name: "UID".to_string(), value: "42".to_string() },
        ]);
        assert_eq!(link.cookie_header(), "acw_tc=abc;UID=42;");
        assert!(link_valid(Some(&link)));
    }

    #[test]
    fn test_download_info() {
        let info: DownloadInfo = serde_json::from_str(
            r#"{"file_name":"a.mp4","file_size":"1024","pick_code":"abc","url":{"url":"https://cdn.115.com/a"}}"#,
        )
        .unwrap();
        assert_eq!(info.file_size.get(), 1024);
        assert!(info.url.valid());

        let info: DownloadInfo = serde_json::from_str(r#"{"file_name":"a.mp4","url":false}"#).unwrap();
        assert!(!info.url.valid());
    }
}
