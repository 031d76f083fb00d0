//! 115云盘OSS临时凭证
//! Temporary object storage credentials used for multipart uploads

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::OpenApiBase;
use super::scalar::{lenient_time, Int, Time};

/// Tokens are refreshed this long before they actually expire
const EXPIRY_MARGIN_MINUTES: i64 = 5;
/// Stand-in lifetime for a token without a usable expiration
const UNLIMITED_DAYS: i64 = 365 * 100;

/// STS credentials / OSS临时凭证
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OssToken {
    #[serde(default, rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(default, rename = "AccessKeySecret")]
    pub access_key_secret: String,
    #[serde(default, rename = "Expiration", deserialize_with = "lenient_time")]
    pub expiration: Time,
    #[serde(default, rename = "SecurityToken")]
    pub security_token: String,
    #[serde(default)]
    pub endpoint: String,
}

impl OssToken {
    /// Remaining lifetime minus the safety margin, may be negative / 剩余有效期
    pub fn time_to_expiry(&self) -> Duration {
        match self.expiration.to_datetime() {
            Some(expiration) => expiration - Utc::now() - Duration::minutes(EXPIRY_MARGIN_MINUTES),
            None => Duration::days(UNLIMITED_DAYS),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.time_to_expiry() <= Duration::zero()
    }
}

/// Token response, nested for the open platform, flat for the cookie API / 凭证响应
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OssTokenResp {
    #[serde(flatten)]
    pub base: OpenApiBase,
    #[serde(default, rename = "StatusCode")]
    pub status_code: Int,
    #[serde(flatten)]
    pub flat: OssToken,
    #[serde(default)]
    pub data: Vec<OssToken>,
}

impl OssTokenResp {
    pub fn token(&self) -> Option<&OssToken> {
        self.data
            .first()
            .or_else(|| (!self.flat.access_key_id.is_empty()).then_some(&self.flat))
    }

    /// Zero when the response carried no token at all
    pub fn time_to_expiry(&self) -> Duration {
        self.token().map_or_else(Duration::zero, OssToken::time_to_expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_in(secs: i64) -> OssToken {
        OssToken {
            access_key_id: "STS.id".to_string(),
            expiration: Time::from(Utc::now() + Duration::seconds(secs)),
            ..Default::default()
        }
    }

    #[test]
    fn test_margin_applied() {
        let ttl = token_expiring_in(3600).time_to_expiry();
        assert!(ttl <= Duration::minutes(55));
        assert!(ttl > Duration::minutes(54));
    }

    #[test]
    fn test_inside_margin_is_expired() {
        let token = token_expiring_in(120);
        assert!(token.time_to_expiry() < Duration::zero());
        assert!(token.is_expired());
    }

    #[test]
    fn test_zero_expiration_is_unlimited() {
        let token = OssToken::default();
        assert!(token.time_to_expiry() > Duration::days(365));
        assert!(!token.is_expired());

        let token: OssToken = serde_json::from_str(r#"{"AccessKeyId":"id","Expiration":""}"#).unwrap();
        assert!(!token.is_expired());

        let token: OssToken = serde_json::from_str(r#"{"AccessKeyId":"id","Expiration":"next week"}"#).unwrap();
        assert!(token.expiration.is_zero());
        assert!(token.time_to_expiry() > Duration::days(365));
    }

    #[test]
    fn test_rfc3339_expiration() {
        let token: OssToken = serde_json::from_str(
            r#"{"AccessKeyId":"STS.x","AccessKeySecret":"s","Expiration":"2023-11-14T22:13:20Z","SecurityToken":"tok","endpoint":"https://oss-cn-shenzhen.aliyuncs.com"}"#,
        )
        .unwrap();
        assert_eq!(token.expiration.unix(), 1700000000);
        assert!(token.is_expired());
        assert_eq!(token.endpoint, "https://oss-cn-shenzhen.aliyuncs.com");
    }

    #[test]
    fn test_response_shapes() {
        let resp: OssTokenResp = serde_json::from_str(
            r#"{"state":true,"code":0,"data":[{"AccessKeyId":"nested","Expiration":"2099-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.token().unwrap().access_key_id, "nested");
        assert!(resp.time_to_expiry() > Duration::days(365));

        let resp: OssTokenResp =
            serde_json::from_str(r#"{"StatusCode":"200","AccessKeyId":"flat","Expiration":"2099-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(resp.status_code, Int(200));
        assert_eq!(resp.token().unwrap().access_key_id, "flat");

        let resp: OssTokenResp = serde_json::from_str(r#"{"state":false,"code":10001}"#).unwrap();
        assert!(resp.token().is_none());
        assert_eq!(resp.time_to_expiry(), Duration::zero());
    }
}
