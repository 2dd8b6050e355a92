//! OrgTracker 前端路由核心
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys（日志除外）：
//! - `pattern`: 路径模式的解析、匹配与反向生成
//! - `location`: 完整路径 (path + query + hash) 的解析与渲染
//! - `route`: 路由描述符与元数据
//! - `table`: 路由表（匹配优先级、构建期校验、OrgTracker 默认路由表）
//! - `guard`: 导航守卫及其注入能力（认证状态、标题输出）
//! - `navigator`: 导航流程 "解析 -> 守卫 -> 重定向 -> 提交"
//!
//! 浏览器相关的适配（localStorage、History API、document.title）在 `frontend` crate 中实现。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (tracing::info!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (tracing::warn!($($t)*))
}

pub mod config;
pub mod error;
pub mod guard;
pub mod location;
pub mod navigator;
pub mod pattern;
pub mod route;
pub mod table;

pub use config::RouterConfig;
pub use error::{RouterError, RouterResult, StorageError};
pub use guard::{
    AuthStateProvider, GuardOutcome, NavigationGuard, REDIRECT_QUERY_KEY, Redirect, RedirectReason,
    TitleSink, TokenAuth, TokenStore,
};
pub use location::{Location, Query};
pub use navigator::{Navigation, NavigationOutcome, NavigationTarget, Navigator};
pub use pattern::{Params, PathPattern};
pub use route::{RouteDescriptor, RouteMetadata, View, names};
pub use table::{ResolvedRoute, RouteInfo, RouteTable, RouteTableBuilder, document_title};
