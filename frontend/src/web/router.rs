//! 路由服务模块 - 浏览器适配
//!
//! 封装了 web_sys 的 History API：所有对 window.history 的操作都集中在此模块。
//! 导航决策（解析、守卫、重定向）全部委托给 `orgtracker_router::Navigator`，
//! 这里只负责把结果写进 History 并通过 Signal 驱动界面更新。

use std::rc::Rc;

use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage as LocalArena;
use orgtracker_router::{
    NavigationOutcome, NavigationTarget, Navigator, Params, Query, ResolvedRoute, RouteTable,
    RouterConfig, RouterResult, TokenAuth,
};
use wasm_bindgen::prelude::*;

use super::{DocumentTitle, LocalStorage};
use crate::auth::token_auth;

type AppNavigator = Navigator<TokenAuth<LocalStorage>, DocumentTitle>;

/// 获取当前浏览器地址（path + search + hash）
fn current_href() -> String {
    web_sys::window()
        .map(|w| w.location())
        .map(|l| {
            format!(
                "{}{}{}",
                l.pathname().unwrap_or_else(|_| "/".to_string()),
                l.search().unwrap_or_default(),
                l.hash().unwrap_or_default()
            )
        })
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    /// 用户发起的导航
    Push,
    /// 重定向、首次加载与前进/后退
    Replace,
}

fn write_history(href: &str, mode: HistoryMode) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = match mode {
                HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(href)),
                HistoryMode::Replace => {
                    history.replace_state_with_url(&JsValue::NULL, "", Some(href))
                }
            };
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    navigator: StoredValue<Rc<AppNavigator>, LocalArena>,
    /// 当前路由（只读信号）
    current_route: ReadSignal<Option<ResolvedRoute>>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<Option<ResolvedRoute>>,
}

impl RouterService {
    fn new(table: RouteTable, config: RouterConfig) -> Self {
        let auth = token_auth(&config);
        let navigator = Navigator::new(table.into(), auth, DocumentTitle, config);
        let (current_route, set_route) = signal(None);

        let router = Self {
            navigator: StoredValue::new_local(Rc::new(navigator)),
            current_route,
            set_route,
        };

        // 从 URL 解析初始路由
        let initial = router.with_navigator(|nav| nav.sync_from_href(&current_href()));
        router.apply(initial, HistoryMode::Replace);
        router
    }

    fn with_navigator<R>(&self, f: impl FnOnce(&AppNavigator) -> R) -> R {
        let navigator = self.navigator.with_value(Rc::clone);
        f(&navigator)
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<Option<ResolvedRoute>> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, target: impl Into<NavigationTarget>) {
        let result = self.with_navigator(|nav| nav.navigate(target));
        self.apply(result, HistoryMode::Push);
    }

    /// 按名称生成带部署前缀的链接
    pub fn href_for(&self, name: &str, params: &Params) -> Option<String> {
        self.with_navigator(|nav| nav.href_for(name, params, Query::new()))
            .map_err(|e| web_sys::console::error_1(&format!("[Router] {}", e).into()))
            .ok()
    }

    /// 把导航结果写入 History 并更新 UI
    fn apply(&self, result: RouterResult<NavigationOutcome>, mode: HistoryMode) {
        match result {
            Ok(NavigationOutcome::Committed(navigation)) => {
                // 只写入最终地址，重定向的中间地址不留在历史记录里
                write_history(&navigation.href, mode);
                self.set_route.set(Some(navigation.route));
            }
            Ok(NavigationOutcome::Superseded) => {}
            Err(e) => {
                web_sys::console::error_1(&format!("[Router] navigation failed: {}", e).into());
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            let result = router.with_navigator(|nav| nav.sync_from_href(&current_href()));
            router.apply(result, HistoryMode::Replace);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self, is_authenticated: Signal<bool>) {
        let router = *self;

        // 使用 Effect 监听认证状态变化
        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            match router.with_navigator(|nav| nav.recheck()) {
                Ok(Some(NavigationOutcome::Committed(navigation))) if navigation.redirected() => {
                    web_sys::console::log_1(
                        &format!(
                            "[Router] Auth state changed (authenticated: {}), redirecting to {}.",
                            is_auth, navigation.href
                        )
                        .into(),
                    );
                    router.apply(
                        Ok(NavigationOutcome::Committed(navigation)),
                        HistoryMode::Push,
                    );
                }
                Ok(_) => {}
                Err(e) => router.apply(Err(e), HistoryMode::Replace),
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    table: RouteTable,
    config: RouterConfig,
    is_authenticated: Signal<bool>,
) -> RouterService {
    let router = RouterService::new(table, config);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect(is_authenticated);

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 路由配置（部署前缀、应用名、token 键）
    config: RouterConfig,
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    let table = match RouteTable::orgtracker() {
        Ok(table) => table,
        Err(e) => {
            web_sys::console::error_1(&format!("[Router] invalid route table: {}", e).into());
            return view! { <p>"Router misconfigured."</p> }.into_any();
        }
    };

    // 提供路由服务到 Context
    provide_router(table, config, is_authenticated);

    children().into_any()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(&ResolvedRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        router
            .current_route()
            .with(|current| current.as_ref().map(matcher))
    }
}

/// 按路由名称生成链接
#[component]
pub fn Link(
    /// 目标路由名称
    #[prop(into)]
    to: String,
    /// 路径参数
    #[prop(optional)]
    params: Params,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = router.href_for(&to, &params).unwrap_or_else(|| "#".to_string());

    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留 ctrl/cmd 点击在新标签页打开的行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        let target = params
            .iter()
            .fold(NavigationTarget::named(to.as_str()), |t, (k, v)| t.param(k, v));
        router.navigate(target);
    };

    view! {
        <a href=href on:click=on_click>
            {children()}
        </a>
    }
}
