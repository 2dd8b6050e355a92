//! OrgTracker 前端外壳
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `orgtracker_router`: 路由表与导航守卫（领域模型与核心引擎）
//! - `web::router`: 路由服务（History API 适配）
//! - `auth`: 认证状态（由 localStorage token 推导）
//! - `components`: 视图层

mod auth;
mod components {
    pub mod pages;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::pages::route_matcher;

use leptos::prelude::*;
use orgtracker_router::RouterConfig;

// 原生 Web API 封装模块
// 把浏览器 API 适配成路由核心需要的注入能力。
pub(crate) mod web {
    pub mod router;
    mod storage;
    mod title;

    pub use storage::LocalStorage;
    pub use title::DocumentTitle;
}

use web::router::{Router, RouterOutlet};

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取构建期配置（部署前缀等）
    let config = RouterConfig::from_build_env();

    // 2. 创建认证上下文（从 LocalStorage 读取 token）
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router config=config is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
