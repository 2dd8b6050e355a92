//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了路由描述符、路由元数据以及每条路由对应的视图。

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::RouterResult;
use crate::pattern::PathPattern;

/// OrgTracker 的路由名称
pub mod names {
    pub const ORGANIZATION_LIST: &str = "OrganizationList";
    pub const ORGANIZATION_DETAIL: &str = "OrganizationDetail";
    pub const LOGIN: &str = "Login";
    pub const REGISTER: &str = "Register";
    pub const USER_PROFILE: &str = "UserProfile";
    pub const FOLLOWED_ORGANIZATIONS: &str = "FollowedOrganizations";
    pub const NOT_FOUND: &str = "NotFound";
}

/// 视图标识
///
/// 具体组件由外壳应用按此枚举渲染，路由层只持有标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    OrganizationList,
    OrganizationDetail,
    LoginForm,
    RegisterForm,
    UserProfile,
    FollowedOrganizations,
    NotFound,
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 路由元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    /// 页面标题，缺省时只显示应用名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 是否需要认证
    pub requires_auth: bool,
    /// 是否仅限访客（已登录用户不应看到，如登录页）
    pub guest_only: bool,
}

impl RouteMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn guest_only(mut self) -> Self {
        self.guest_only = true;
        self
    }
}

/// 路由描述符：URL 模式 + 名称 + 视图 + 元数据
///
/// 注册后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    name: String,
    pattern: PathPattern,
    view: View,
    meta: RouteMetadata,
}

impl RouteDescriptor {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        view: View,
        meta: RouteMetadata,
    ) -> RouterResult<Self> {
        Ok(Self {
            name: name.into(),
            pattern: PathPattern::parse(pattern)?,
            view,
            meta,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn meta(&self) -> &RouteMetadata {
        &self.meta
    }

    /// **核心守卫属性：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.meta.requires_auth
    }

    /// 已认证用户是否应该离开此路由（如登录页）
    pub fn guest_only(&self) -> bool {
        self.meta.guest_only
    }

    pub fn is_catch_all(&self) -> bool {
        self.pattern.is_catch_all()
    }
}

impl Display for RouteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.pattern)
    }
}
