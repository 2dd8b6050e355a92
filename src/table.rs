//! 路由表
//!
//! 显式路由按注册顺序先匹配先得，兜底路由无论注册在哪里都排在最后。
//! 构建时完成全部校验，之后路由表只读，可以在多个导航器之间共享。

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{RouterError, RouterResult};
use crate::location::{Location, Query};
use crate::pattern::Params;
use crate::route::{RouteDescriptor, RouteMetadata, View, names};

/// 解析结果：命中的路由 + 参数 + 位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    route: Arc<RouteDescriptor>,
    params: Params,
    location: Location,
    fallback: bool,
    outside_base: bool,
}

impl ResolvedRoute {
    pub fn route(&self) -> &RouteDescriptor {
        &self.route
    }

    pub fn name(&self) -> &str {
        self.route.name()
    }

    pub fn view(&self) -> View {
        self.route.view()
    }

    pub fn meta(&self) -> &RouteMetadata {
        self.route.meta()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn full_path(&self) -> String {
        self.location.full_path()
    }

    /// 是否落到了兜底路由（没有显式模式匹配）
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// 是否来自部署前缀之外的 URL，此时 `location` 保存的是原始地址
    pub fn is_outside_base(&self) -> bool {
        self.outside_base
    }
}

/// 暴露给视图的路由信息，用于生成链接与条件渲染
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
    pub view: View,
    pub meta: RouteMetadata,
}

/// 文档标题：`"{title} - {app_name}"`，没有标题时只显示应用名
pub fn document_title(meta: &RouteMetadata, app_name: &str) -> String {
    match meta.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} - {}", title, app_name),
        _ => app_name.to_string(),
    }
}

// =========================================================
// 构建器
// =========================================================

pub struct RouteTableBuilder {
    routes: Vec<RouteDescriptor>,
    login: String,
    home: String,
    error: Option<RouterError>,
}

impl RouteTableBuilder {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            login: names::LOGIN.to_string(),
            home: names::ORGANIZATION_LIST.to_string(),
            error: None,
        }
    }

    /// 注册一条路由；模式解析错误延迟到 `build` 时返回
    pub fn route(mut self, name: &str, pattern: &str, view: View, meta: RouteMetadata) -> Self {
        match RouteDescriptor::new(name, pattern, view, meta) {
            Ok(route) => self.routes.push(route),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn descriptor(mut self, route: RouteDescriptor) -> Self {
        self.routes.push(route);
        self
    }

    /// 认证失败时的重定向目标（默认 `Login`）
    pub fn login_route(mut self, name: &str) -> Self {
        self.login = name.to_string();
        self
    }

    /// 已登录用户访问访客页时的重定向目标（默认 `OrganizationList`）
    pub fn home_route(mut self, name: &str) -> Self {
        self.home = name.to_string();
        self
    }

    pub fn build(self) -> RouterResult<RouteTable> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut explicit: Vec<RouteDescriptor> = Vec::new();
        let mut catch_all: Option<RouteDescriptor> = None;

        for route in self.routes {
            if explicit.iter().chain(catch_all.iter()).any(|r| r.name() == route.name()) {
                return Err(RouterError::DuplicateRoute(route.name().to_string()));
            }
            if route.requires_auth() && route.guest_only() {
                return Err(RouterError::ConflictingFlags(route.name().to_string()));
            }
            if route.is_catch_all() {
                if catch_all.is_some() {
                    return Err(RouterError::DuplicateCatchAll(route.name().to_string()));
                }
                catch_all = Some(route);
                continue;
            }
            if let Some(earlier) = explicit.iter().find(|r| r.pattern().covers(route.pattern())) {
                return Err(RouterError::AmbiguousPattern {
                    earlier: earlier.name().to_string(),
                    later: route.name().to_string(),
                    pattern: route.pattern().to_string(),
                });
            }
            explicit.push(route);
        }

        let catch_all = catch_all.ok_or(RouterError::MissingCatchAll)?;
        let explicit_len = explicit.len();
        let routes: Vec<Arc<RouteDescriptor>> = explicit
            .into_iter()
            .chain(std::iter::once(catch_all))
            .map(Arc::new)
            .collect();
        let index: HashMap<String, usize> = routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name().to_string(), i))
            .collect();

        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))
        };
        let login = lookup(&self.login)?;
        let home = lookup(&self.home)?;

        // 重定向目标自身不能再触发指向它的那条重定向分支
        if routes[login].requires_auth() {
            return Err(RouterError::RedirectLoop {
                route: self.login,
                reason: "login route requires authentication".to_string(),
            });
        }
        if routes[home].guest_only() {
            return Err(RouterError::RedirectLoop {
                route: self.home,
                reason: "home route is guest-only".to_string(),
            });
        }

        // 重定向时没有可用的路径参数，两个目标都必须是固定路径
        let fixed_path = |i: usize| -> RouterResult<String> {
            let pattern = routes[i].pattern();
            match pattern.param_names().next() {
                Some(_) => Err(RouterError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: format!("redirect target `{}` cannot take parameters", routes[i].name()),
                }),
                None => pattern.build(&Params::new()).map_err(|param| RouterError::MissingParameter {
                    route: routes[i].name().to_string(),
                    param: param.to_string(),
                }),
            }
        };
        let login_path = fixed_path(login)?;
        let home_path = fixed_path(home)?;

        Ok(RouteTable {
            routes,
            explicit_len,
            index,
            login,
            home,
            login_path,
            home_path,
        })
    }
}

// =========================================================
// 路由表
// =========================================================

#[derive(Debug, Clone)]
pub struct RouteTable {
    /// 显式路由在前，兜底路由固定在最后
    routes: Vec<Arc<RouteDescriptor>>,
    explicit_len: usize,
    index: HashMap<String, usize>,
    login: usize,
    home: usize,
    login_path: String,
    home_path: String,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// OrgTracker 应用的路由表
    pub fn orgtracker() -> RouterResult<Self> {
        Self::builder()
            .route(
                names::ORGANIZATION_LIST,
                "/",
                View::OrganizationList,
                RouteMetadata::titled("Organizations"),
            )
            .route(
                names::ORGANIZATION_DETAIL,
                "/organizations/:slug",
                View::OrganizationDetail,
                RouteMetadata::titled("Organization Detail"),
            )
            .route(
                names::LOGIN,
                "/login",
                View::LoginForm,
                RouteMetadata::titled("Login").guest_only(),
            )
            .route(
                names::REGISTER,
                "/register",
                View::RegisterForm,
                RouteMetadata::titled("Register").guest_only(),
            )
            .route(
                names::USER_PROFILE,
                "/profile",
                View::UserProfile,
                RouteMetadata::titled("Profile").requires_auth(),
            )
            .route(
                names::FOLLOWED_ORGANIZATIONS,
                "/followed",
                View::FollowedOrganizations,
                RouteMetadata::titled("Followed Organizations").requires_auth(),
            )
            .route(
                names::NOT_FOUND,
                "/:pathMatch(.*)*",
                View::NotFound,
                RouteMetadata::titled("Page Not Found"),
            )
            .login_route(names::LOGIN)
            .home_route(names::ORGANIZATION_LIST)
            .build()
    }

    /// 将完整路径解析为唯一的路由
    ///
    /// 纯函数：不会失败，未匹配的路径落到兜底路由。
    pub fn resolve(&self, full_path: &str) -> ResolvedRoute {
        self.resolve_location(Location::parse(full_path))
    }

    pub fn resolve_location(&self, location: Location) -> ResolvedRoute {
        for route in &self.routes[..self.explicit_len] {
            if let Some(params) = route.pattern().matches(location.path()) {
                return ResolvedRoute {
                    route: Arc::clone(route),
                    params,
                    location,
                    fallback: false,
                    outside_base: false,
                };
            }
        }

        self.resolve_fallback(location, false)
    }

    fn resolve_fallback(&self, location: Location, outside_base: bool) -> ResolvedRoute {
        let catch_all = &self.routes[self.explicit_len];
        ResolvedRoute {
            route: Arc::clone(catch_all),
            params: catch_all.pattern().matches(location.path()).unwrap_or_default(),
            location,
            fallback: true,
            outside_base,
        }
    }

    /// 部署前缀之外的 URL 不参与匹配，直接落到兜底路由
    pub fn resolve_outside_base(&self, location: Location) -> ResolvedRoute {
        self.resolve_fallback(location, true)
    }

    pub fn get(&self, name: &str) -> Option<&RouteDescriptor> {
        self.index.get(name).map(|&i| self.routes[i].as_ref())
    }

    /// 全部路由，按匹配优先级排列（兜底路由最后）
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().map(Arc::as_ref)
    }

    pub fn login_route(&self) -> &RouteDescriptor {
        &self.routes[self.login]
    }

    pub fn home_route(&self) -> &RouteDescriptor {
        &self.routes[self.home]
    }

    /// 登录页的应用内路径
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// 首页的应用内路径
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn not_found_route(&self) -> &RouteDescriptor {
        &self.routes[self.explicit_len]
    }

    /// 按名称生成位置
    pub fn location_for(&self, name: &str, params: &Params, query: Query) -> RouterResult<Location> {
        let route = self
            .get(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        let path = route
            .pattern()
            .build(params)
            .map_err(|param| RouterError::MissingParameter {
                route: name.to_string(),
                param: param.to_string(),
            })?;
        Ok(Location::new(path, query))
    }

    /// 按名称生成应用内链接（不含部署前缀）
    pub fn href_for(&self, name: &str, params: &Params, query: Query) -> RouterResult<String> {
        Ok(self.location_for(name, params, query)?.full_path())
    }

    pub fn manifest(&self) -> Vec<RouteInfo> {
        self.routes()
            .map(|route| RouteInfo {
                name: route.name().to_string(),
                path: route.pattern().to_string(),
                view: route.view(),
                meta: route.meta().clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
