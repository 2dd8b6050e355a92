//! 导航器 - 核心引擎
//!
//! 实现了 "解析 -> 验证(Guard) -> 重定向 -> 提交" 的导航流程，
//! 不接触任何浏览器 API：History 操作由外壳根据返回的 `href` 完成，
//! 标题通过注入的 [`TitleSink`] 输出。
//!
//! 并发策略：后发先至 (last-wins)。每次导航领取一个递增的票号，
//! 若在守卫执行期间有更新的导航开始（例如注入能力内部再次触发导航），
//! 旧导航返回 [`NavigationOutcome::Superseded`]，不做任何提交。

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::guard::{AuthStateProvider, GuardOutcome, NavigationGuard, TitleSink};
use crate::location::{Location, Query};
use crate::pattern::Params;
use crate::table::{ResolvedRoute, RouteTable, document_title};

/// 导航目标：路径，或按名称 + 参数 + query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Path(String),
    Named {
        name: String,
        params: Params,
        query: Query,
    },
}

impl NavigationTarget {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: Params::new(),
            query: Query::new(),
        }
    }

    /// 追加路径参数（仅对按名称导航有效）
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key, value);
        }
        self
    }

    /// 追加 query 参数（仅对按名称导航有效）
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { query, .. } = &mut self {
            query.insert(key, value);
        }
        self
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// 一次已提交的导航
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// 最终提交的路由
    pub route: ResolvedRoute,
    /// 若发生了重定向，最初请求的路由
    pub redirected_from: Option<ResolvedRoute>,
    /// 带部署前缀的地址，供外壳写入 History
    pub href: String,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Committed(Navigation),
    /// 被更新的导航取代，未提交
    Superseded,
}

impl NavigationOutcome {
    pub fn committed(self) -> Option<Navigation> {
        match self {
            Self::Committed(navigation) => Some(navigation),
            Self::Superseded => None,
        }
    }
}

/// 导航器
///
/// 单线程使用：内部状态放在 `Cell`/`RefCell` 中，外壳通过 `Rc` 共享。
pub struct Navigator<A, T> {
    guard: NavigationGuard<A>,
    title: T,
    config: RouterConfig,
    current: RefCell<Option<ResolvedRoute>>,
    ticket: Cell<u64>,
}

impl<A: AuthStateProvider, T: TitleSink> Navigator<A, T> {
    pub fn new(table: Arc<RouteTable>, auth: A, title: T, config: RouterConfig) -> Self {
        Self {
            guard: NavigationGuard::new(table, auth),
            title,
            config,
            current: RefCell::new(None),
            ticket: Cell::new(0),
        }
    }

    pub fn table(&self) -> &RouteTable {
        self.guard.table()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.guard.is_authenticated()
    }

    /// 最近一次提交的路由
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.current.borrow().clone()
    }

    /// 解析应用内路径，不触发守卫
    pub fn resolve(&self, full_path: &str) -> ResolvedRoute {
        self.table().resolve(full_path)
    }

    /// 按名称生成带部署前缀的链接
    pub fn href_for(&self, name: &str, params: &Params, query: Query) -> RouterResult<String> {
        let full_path = self.table().href_for(name, params, query)?;
        Ok(self.config.href(&full_path))
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, target: impl Into<NavigationTarget>) -> RouterResult<NavigationOutcome> {
        let resolved = match target.into() {
            NavigationTarget::Path(path) => self.table().resolve(&path),
            NavigationTarget::Named { name, params, query } => {
                let location = self.table().location_for(&name, &params, query)?;
                self.table().resolve_location(location)
            }
        };
        self.run(resolved)
    }

    /// 浏览器发起的导航（首次加载、前进/后退），`href` 带部署前缀
    pub fn sync_from_href(&self, href: &str) -> RouterResult<NavigationOutcome> {
        let resolved = match self.config.strip_base(href) {
            Some(full_path) => self.table().resolve(full_path),
            None => {
                log_warn!("[Router] {} is outside base path {:?}", href, self.config.base_path());
                self.table().resolve_outside_base(Location::parse(href))
            }
        };
        self.run(resolved)
    }

    /// 认证状态变化后，对当前位置重新执行守卫
    pub fn recheck(&self) -> RouterResult<Option<NavigationOutcome>> {
        let Some(current) = self.current() else {
            return Ok(None);
        };
        let location = current.location().clone();
        let resolved = if current.is_outside_base() {
            self.table().resolve_outside_base(location)
        } else {
            self.table().resolve_location(location)
        };
        self.run(resolved).map(Some)
    }

    fn run(&self, requested: ResolvedRoute) -> RouterResult<NavigationOutcome> {
        let ticket = self.ticket.get() + 1;
        self.ticket.set(ticket);

        let from = self.current();
        let mut to = requested;
        let mut redirected_from: Option<ResolvedRoute> = None;
        let mut visited = vec![to.full_path()];

        loop {
            let outcome = self.guard.check(&to, from.as_ref());
            if self.ticket.get() != ticket {
                log_info!("[Router] navigation to {} superseded", to.full_path());
                return Ok(NavigationOutcome::Superseded);
            }

            let redirect = match outcome {
                GuardOutcome::Allow => break,
                GuardOutcome::Redirect(redirect) => redirect,
            };

            if visited.len() > self.config.max_redirects() {
                return Err(RouterError::RedirectLoop {
                    route: redirect.name,
                    reason: format!("more than {} redirects", self.config.max_redirects()),
                });
            }

            let next = self.table().resolve_location(redirect.location(self.table()));
            let next_path = next.full_path();
            if visited.contains(&next_path) {
                return Err(RouterError::RedirectLoop {
                    route: redirect.name,
                    reason: format!("{} visited twice", next_path),
                });
            }
            visited.push(next_path);

            let previous = std::mem::replace(&mut to, next);
            redirected_from.get_or_insert(previous);
        }

        *self.current.borrow_mut() = Some(to.clone());
        self.title
            .set_title(&document_title(to.meta(), self.config.app_name()));
        if self.ticket.get() != ticket {
            return Ok(NavigationOutcome::Superseded);
        }

        log_info!("[Router] committed {} ({})", to.name(), to.full_path());
        // 前缀之外的地址原样保留，不能改写成应用内的路径
        let href = if to.is_outside_base() {
            to.full_path()
        } else {
            self.config.href(&to.full_path())
        };
        Ok(NavigationOutcome::Committed(Navigation {
            route: to,
            redirected_from,
            href,
        }))
    }
}
