// =========================================================
// 运行时配置 (Router Configuration)
// =========================================================

/// 构建环境未提供时使用的默认值
pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_APP_NAME: &str = "OrgTracker";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_MAX_REDIRECTS: usize = 8;

/// 路由配置
///
/// `base_path` 是部署路径前缀，由构建环境提供，所有生成的 href 都会带上它。
/// 内部保存为规范化形式：以 `/` 开头、不以 `/` 结尾，根路径保存为空串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    base_path: String,
    app_name: String,
    token_key: String,
    max_redirects: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: normalize_base(DEFAULT_BASE_PATH),
            app_name: DEFAULT_APP_NAME.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从构建期环境变量读取配置，读不到就用默认值
    ///
    /// - `ORGTRACKER_BASE_URL`: 部署路径前缀
    /// - `ORGTRACKER_APP_NAME`: 标题后缀中的应用名
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(base) = option_env!("ORGTRACKER_BASE_URL") {
            config = config.with_base_path(base);
        }
        if let Some(name) = option_env!("ORGTRACKER_APP_NAME") {
            config = config.with_app_name(name);
        }
        config
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base(base_path);
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_token_key(mut self, token_key: impl Into<String>) -> Self {
        self.token_key = token_key.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// 给应用内完整路径加上部署前缀
    pub fn href(&self, full_path: &str) -> String {
        format!("{}{}", self.base_path, full_path)
    }

    /// 去掉浏览器 URL 的部署前缀，得到应用内路径
    ///
    /// 不在前缀之下的 URL 返回 `None`。
    pub fn strip_base<'a>(&self, href: &'a str) -> Option<&'a str> {
        if self.base_path.is_empty() {
            return Some(href);
        }
        let rest = href.strip_prefix(self.base_path.as_str())?;
        match rest.chars().next() {
            None => Some("/"),
            Some('/') | Some('?') | Some('#') => Some(rest),
            // `/app` 不应该匹配 `/application`
            Some(_) => None,
        }
    }
}

fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
