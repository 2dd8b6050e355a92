//! 应用内位置：path + query + hash
//!
//! 完整路径 (full path) 不含部署前缀，部署前缀由 [`crate::RouterConfig`] 负责。

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::pattern::{decode_component, encode_component};

/// 有序的 query 参数表，允许重复的键
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析 `a=1&b=2` 形式的 query 串（不含 `?`）
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self(
            raw.split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    (decode_query_part(key), decode_query_part(value))
                })
                .collect(),
        )
    }

    /// 第一个同名参数的值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 编码为 query 串（不含 `?`）
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode_query_part(raw: &str) -> String {
    decode_component(&raw.replace('+', " "))
}

/// 解析后的应用内位置
///
/// 由 [`Location::parse`] 得到的位置会保留原始文本，`full_path` 原样返回它；
/// 由 [`Location::new`] 构造的位置则按 URI component 规则重新编码 query。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    path: String,
    query: Query,
    hash: Option<String>,
    #[serde(skip)]
    raw: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>, query: Query) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            query,
            hash: None,
            raw: None,
        }
    }

    /// 解析完整路径，如 `/login?redirect=%2Fprofile#top`
    pub fn parse(full_path: &str) -> Self {
        let (rest, hash) = match full_path.split_once('#') {
            Some((rest, hash)) => (rest, Some(hash.to_string())),
            None => (full_path, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Query::parse(query)),
            None => (rest, Query::new()),
        };
        let (path, raw) = if path.starts_with('/') {
            (path.to_string(), full_path.to_string())
        } else {
            (format!("/{}", path), format!("/{}", full_path))
        };
        Self {
            path,
            query,
            hash,
            raw: Some(raw),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// 完整路径：`path[?query][#hash]`
    pub fn full_path(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let mut full = self.path.clone();
        if !self.query.is_empty() {
            full.push('?');
            full.push_str(&self.query.encode());
        }
        if let Some(hash) = &self.hash {
            full.push('#');
            full.push_str(hash);
        }
        full
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_path())
    }
}
