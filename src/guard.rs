//! 导航守卫
//!
//! 每次导航（包括重定向引起的再次进入）都同步执行一次，依次检查：
//! 1. 目标需要认证而用户未认证 -> 重定向到登录页，并把原完整路径放进 `redirect` 参数
//! 2. 目标仅限访客而用户已认证 -> 重定向到首页，不带参数
//! 3. 否则放行
//!
//! 认证状态与标题输出都通过注入的能力获取，守卫本身不接触任何全局对象。

use std::sync::Arc;

use crate::error::StorageError;
use crate::location::{Location, Query};
use crate::table::{ResolvedRoute, RouteTable};

/// 登录页用来回跳原页面的 query 参数名
pub const REDIRECT_QUERY_KEY: &str = "redirect";

// =========================================================
// 注入能力
// =========================================================

/// 认证状态来源
pub trait AuthStateProvider {
    fn is_authenticated(&self) -> bool;
}

impl<F: Fn() -> bool> AuthStateProvider for F {
    fn is_authenticated(&self) -> bool {
        self()
    }
}

/// 文档标题输出
pub trait TitleSink {
    fn set_title(&self, title: &str);
}

impl<F: Fn(&str)> TitleSink for F {
    fn set_title(&self, title: &str) {
        self(title)
    }
}

/// 持久化 token 的只读访问
pub trait TokenStore {
    fn read_token(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// 以 "是否存在 token" 作为认证状态
///
/// 空串视为不存在；读取失败视为未认证（fail closed）。
pub struct TokenAuth<S> {
    store: S,
    key: String,
}

impl<S: TokenStore> TokenAuth<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

impl<S: TokenStore> AuthStateProvider for TokenAuth<S> {
    fn is_authenticated(&self) -> bool {
        match self.store.read_token(&self.key) {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                log_warn!("[Guard] token read failed, treating as signed out: {}", e);
                false
            }
        }
    }
}

// =========================================================
// 守卫结果
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// 目标需要认证，但用户未认证
    Unauthenticated,
    /// 目标仅限访客，但用户已认证
    AlreadyAuthenticated,
}

/// 重定向目标（按路由名称）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub name: String,
    pub query: Query,
    pub reason: RedirectReason,
}

impl Redirect {
    /// 在路由表中解析出重定向目标的位置
    pub fn location(&self, table: &RouteTable) -> Location {
        let path = match self.reason {
            RedirectReason::Unauthenticated => table.login_path(),
            RedirectReason::AlreadyAuthenticated => table.home_path(),
        };
        Location::new(path, self.query.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Redirect),
}

// =========================================================
// 守卫
// =========================================================

pub struct NavigationGuard<A> {
    table: Arc<RouteTable>,
    auth: A,
}

impl<A: AuthStateProvider> NavigationGuard<A> {
    pub fn new(table: Arc<RouteTable>, auth: A) -> Self {
        Self { table, auth }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// **核心守卫逻辑**
    pub fn check(&self, to: &ResolvedRoute, from: Option<&ResolvedRoute>) -> GuardOutcome {
        let is_auth = self.auth.is_authenticated();
        let from_name = from.map(ResolvedRoute::name).unwrap_or("(initial)");

        if to.meta().requires_auth && !is_auth {
            log_info!(
                "[Guard] {} -> {}: access denied, redirecting to login",
                from_name,
                to.name()
            );
            return GuardOutcome::Redirect(Redirect {
                name: self.table.login_route().name().to_string(),
                query: Query::new().with(REDIRECT_QUERY_KEY, to.full_path()),
                reason: RedirectReason::Unauthenticated,
            });
        }

        if to.meta().guest_only && is_auth {
            log_info!(
                "[Guard] {} -> {}: already authenticated, redirecting home",
                from_name,
                to.name()
            );
            return GuardOutcome::Redirect(Redirect {
                name: self.table.home_route().name().to_string(),
                query: Query::new(),
                reason: RedirectReason::AlreadyAuthenticated,
            });
        }

        GuardOutcome::Allow
    }
}

#[cfg(test)]
mod tests;
