//! 路径模式
//!
//! 支持的语法与前端路由配置一致：
//! - 静态段：`/login`，按 ASCII 忽略大小写比较
//! - 命名段：`/organizations/:slug`，匹配单个非空路径段
//! - 兜底段：`/:pathMatch(.*)*`，必须位于最后，匹配剩余的任意路径（可以为空）
//!
//! 末尾的单个 `/` 可有可无，`/login/` 与 `/login` 等价。

use std::collections::BTreeMap;
use std::fmt::Display;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

const CATCH_ALL_SUFFIX: &str = "(.*)*";

/// 与浏览器 `encodeURIComponent` 相同的保留字符集
pub(crate) const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

pub(crate) fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

// =========================================================
// 路径参数
// =========================================================

/// 匹配得到的命名参数，按名称有序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =========================================================
// 模式
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

/// 编译后的路径模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// 解析路径模式
    pub fn parse(raw: &str) -> RouterResult<Self> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        let body = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("pattern must start with `/`"))?;
        let body = body.strip_suffix('/').unwrap_or(body);

        let mut segments = Vec::new();
        if !body.is_empty() {
            let parts: Vec<&str> = body.split('/').collect();
            let last = parts.len() - 1;
            for (index, part) in parts.into_iter().enumerate() {
                let segment = match part.strip_prefix(':') {
                    Some(param) => {
                        let (name, catch_all) = match param.strip_suffix(CATCH_ALL_SUFFIX) {
                            Some(name) => (name, true),
                            None => (param, false),
                        };
                        if name.is_empty() {
                            return Err(invalid("parameter name is empty"));
                        }
                        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                            return Err(invalid("unsupported parameter syntax"));
                        }
                        if segments.iter().any(|s| matches!(s, Segment::Param(n) | Segment::CatchAll(n) if n == name)) {
                            return Err(invalid("duplicate parameter name"));
                        }
                        if catch_all {
                            if index != last {
                                return Err(invalid("catch-all must be the last segment"));
                            }
                            Segment::CatchAll(name.to_string())
                        } else {
                            Segment::Param(name.to_string())
                        }
                    }
                    None if part.is_empty() => return Err(invalid("empty path segment")),
                    None => Segment::Static(part.to_string()),
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 是否是匹配任意路径的兜底模式
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::CatchAll(_)])
    }

    /// 模式中的参数名，按出现顺序
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// 用路径匹配此模式，成功时返回解码后的参数
    ///
    /// `path` 只包含路径部分，不含 query 与 hash。
    pub fn matches(&self, path: &str) -> Option<Params> {
        let body = path.strip_prefix('/').unwrap_or(path);
        let body = body.strip_suffix('/').unwrap_or(body);
        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };

        let mut params = Params::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(literal) => {
                    let part = parts.get(index)?;
                    if !decode_component(part).eq_ignore_ascii_case(literal) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let part = parts.get(index)?;
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.as_str(), decode_component(part));
                }
                Segment::CatchAll(name) => {
                    let rest = parts.get(index..).unwrap_or_default();
                    params.insert(name.as_str(), decode_component(&rest.join("/")));
                    return Some(params);
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// 反向生成路径
    ///
    /// 参数值按单个路径段编码；兜底段的值按 `/` 拆分后逐段编码。
    /// 缺少参数时返回缺失的参数名。
    pub fn build(&self, params: &Params) -> Result<String, &str> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(literal) => {
                    path.push('/');
                    path.push_str(literal);
                }
                Segment::Param(name) => {
                    let value = params.get(name).filter(|v| !v.is_empty()).ok_or(name.as_str())?;
                    path.push('/');
                    path.push_str(&encode_component(value));
                }
                Segment::CatchAll(name) => {
                    let value = params.get(name).unwrap_or_default();
                    for part in value.split('/').filter(|p| !p.is_empty()) {
                        path.push('/');
                        path.push_str(&encode_component(part));
                    }
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// 能被 `other` 匹配的路径是否全部也能被此模式匹配
    ///
    /// 先注册的模式覆盖了后注册的模式时，后者永远不会被选中。
    pub fn covers(&self, other: &PathPattern) -> bool {
        for (index, segment) in self.segments.iter().enumerate() {
            match (segment, other.segments.get(index)) {
                (Segment::CatchAll(_), _) => return true,
                (_, None) | (_, Some(Segment::CatchAll(_))) => return false,
                (Segment::Param(_), Some(_)) => {}
                (Segment::Static(a), Some(Segment::Static(b))) if a.eq_ignore_ascii_case(b) => {}
                _ => return false,
            }
        }
        self.segments.len() == other.segments.len()
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
