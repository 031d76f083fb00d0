//! 115云盘文件类型定义
//! File entries shared by the cookie and open platform listings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scalar::{BoolOrInt, Int64, LenientString, Time};

/// File or folder entry / 文件或文件夹
///
/// Holds every field name either dialect uses. Read it through the `*_best`
/// accessors instead of the raw fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct File {
    /// 文件ID，文件夹为空
    #[serde(default)]
    pub fid: LenientString,
    /// 目录ID
    #[serde(default)]
    pub cid: LenientString,
    #[serde(default)]
    pub pid: LenientString,
    /// 开放平台文件名
    #[serde(default, rename = "fn")]
    pub file_name: String,
    /// 传统接口文件名
    #[serde(default)]
    pub n: String,
    #[serde(default)]
    pub fs: Int64,
    #[serde(default)]
    pub s: Int64,
    #[serde(default)]
    pub sha1: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub pc: String,
    /// "0" folder, "1" file (open platform only)
    #[serde(default)]
    pub fc: LenientString,
    #[serde(default)]
    pub upt: Time,
    #[serde(default)]
    pub uet: Time,
    #[serde(default)]
    pub te: Time,
    #[serde(default)]
    pub tu: Time,
    /// Traditional "modified" text, usually Unix seconds as a string
    #[serde(default)]
    pub t: LenientString,
    #[serde(default)]
    pub ico: String,
    /// Thumbnail URL / 缩略图
    #[serde(default)]
    pub u: String,
    #[serde(default)]
    pub play_long: Int64,
    /// Starred / 星标
    #[serde(default)]
    pub m: BoolOrInt,
}

impl File {
    pub fn is_dir(&self) -> bool {
        self.fc.as_str() == "0" || (self.fid.is_empty() && !self.cid.is_empty())
    }

    pub fn id(&self) -> &str {
        if !self.fid.is_empty() {
            self.fid.as_str()
        } else {
            self.cid.as_str()
        }
    }

    pub fn parent_id(&self) -> &str {
        self.pid.as_str()
    }

    pub fn file_name_best(&self) -> &str {
        if !self.file_name.is_empty() {
            &self.file_name
        } else {
            &self.n
        }
    }

    pub fn file_size_best(&self) -> i64 {
        if !self.fs.is_zero() {
            self.fs.get()
        } else {
            self.s.get()
        }
    }

    pub fn sha1_best(&self) -> &str {
        if !self.sha1.is_empty() {
            &self.sha1
        } else {
            &self.sha
        }
    }

    pub fn pick_code(&self) -> &str {
        &self.pc
    }

    /// Modification time, `None` when no timestamp field is usable / 修改时间
    ///
    /// Order: `upt`, `uet`, `te`, `tu`, then the textual `t`.
    pub fn mod_time(&self) -> Option<DateTime<Utc>> {
        [self.upt, self.uet, self.te, self.tu]
            .iter()
            .filter_map(Time::to_datetime)
            .next()
            .or_else(|| {
                self.t
                    .as_str()
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
            })
    }
}

/// Breadcrumb entry of a listing / 路径节点
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathNode {
    #[serde(default)]
    pub cid: LenientString,
    #[serde(default)]
    pub pid: LenientString,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_file() {
        let f: File = serde_json::from_str(r#"{"fn":"a.txt","fs":100,"fid":"123"}"#).unwrap();
        assert_eq!(f.file_name_best(), "a.txt");
        assert_eq!(f.file_size_best(), 100);
        assert_eq!(f.id(), "123");
        assert!(!f.is_dir());
    }

    #[test]
    fn test_traditional_folder() {
        let f: File = serde_json::from_str(r#"{"n":"folder","cid":"55","fc":0}"#).unwrap();
        assert!(f.is_dir());
        assert_eq!(f.id(), "55");
        assert_eq!(f.file_name_best(), "folder");

        let f: File = serde_json::from_str(r#"{"n":"docs","cid":2593093001609739968,"pid":"0"}"#).unwrap();
        assert!(f.is_dir());
        assert_eq!(f.id(), "2593093001609739968");
        assert_eq!(f.parent_id(), "0");
    }

    #[test]
    fn test_traditional_file_fields() {
        let f: File = serde_json::from_str(
            r#"{"fid":"7","cid":"55","n":"b.mkv","s":"2048","sha":"ABCDEF","pc":"pc1","fc":"1"}"#,
        )
        .unwrap();
        assert!(!f.is_dir());
        assert_eq!(f.id(), "7");
        assert_eq!(f.file_size_best(), 2048);
        assert_eq!(f.sha1_best(), "ABCDEF");
        assert_eq!(f.pick_code(), "pc1");
    }

    #[test]
    fn test_openapi_fields_win() {
        let f: File = serde_json::from_str(
            r#"{"fid":"1","fn":"new","n":"old","fs":"10","s":20,"sha1":"aa","sha":"bb"}"#,
        )
        .unwrap();
        assert_eq!(f.file_name_best(), "new");
        assert_eq!(f.file_size_best(), 10);
        assert_eq!(f.sha1_best(), "aa");

        let f: File = serde_json::from_str(r#"{"fid":"1","fs":0,"s":20,"sha1":""}"#).unwrap();
        assert_eq!(f.file_size_best(), 20);
        assert_eq!(f.sha1_best(), "");
    }

    #[test]
    fn test_empty_entry() {
        let f: File = serde_json::from_str("{}").unwrap();
        assert_eq!(f.id(), "");
        assert!(!f.is_dir());
        assert_eq!(f.mod_time(), None);
    }

    #[test]
    fn test_mod_time_order() {
        let f: File = serde_json::from_str(r#"{"upt":1700000000,"te":"1600000000","t":"1500000000"}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1700000000);

        let f: File = serde_json::from_str(r#"{"uet":"1690000000","tu":1600000000}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1690000000);

        let f: File = serde_json::from_str(r#"{"te":"1600000000","tu":"1610000000"}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1600000000);

        let f: File = serde_json::from_str(r#"{"tu":"2023-11-14T22:13:20Z"}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1700000000);

        let f: File = serde_json::from_str(r#"{"t":"1500000000"}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1500000000);

        let f: File = serde_json::from_str(r#"{"upt":"9223372036854775807","te":"1600000000"}"#).unwrap();
        assert_eq!(f.mod_time().unwrap().timestamp(), 1600000000);

        let f: File = serde_json::from_str(r#"{"t":"2023-01-01 10:00"}"#).unwrap();
        assert_eq!(f.mod_time(), None);
    }
}
