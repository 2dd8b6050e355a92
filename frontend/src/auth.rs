//! 认证模块
//!
//! 认证状态完全由 localStorage 中的 token 推导，与路由系统解耦。
//! 路由服务通过注入的认证信号感知状态变化。

use crate::web::LocalStorage;
use leptos::prelude::*;
use orgtracker_router::{AuthStateProvider, RouterConfig, TokenAuth};
use wasm_bindgen::prelude::*;

/// 以 localStorage token 判断认证状态的守卫能力
pub fn token_auth(config: &RouterConfig) -> TokenAuth<LocalStorage> {
    TokenAuth::new(LocalStorage, config.token_key())
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    is_authenticated: ReadSignal<bool>,
    /// 设置认证状态（写入）
    set_authenticated: WriteSignal<bool>,
    /// token 在 localStorage 中的键
    token_key: StoredValue<String>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始状态从 localStorage 读取
    pub fn new(config: &RouterConfig) -> Self {
        let (is_authenticated, set_authenticated) =
            signal(token_auth(config).is_authenticated());
        Self {
            is_authenticated,
            set_authenticated,
            token_key: StoredValue::new(config.token_key().to_string()),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.is_authenticated.into()
    }

    /// 重新读取 token
    ///
    /// 登录/注销流程写入 token 后调用；其他标签页的改动由 storage 事件触发。
    pub fn refresh(&self) {
        let key = self.token_key.get_value();
        let auth = TokenAuth::new(LocalStorage, key);
        self.set_authenticated.set(auth.is_authenticated());
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态并监听其他标签页对 token 的修改
pub fn init_auth(ctx: &AuthContext) {
    let ctx = *ctx;
    let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(move |event: web_sys::StorageEvent| {
        // key 为 None 表示整个 storage 被清空
        let relevant = match event.key() {
            Some(key) => ctx.token_key.with_value(|k| *k == key),
            None => true,
        };
        if relevant {
            web_sys::console::log_1(&"[Auth] token changed in another tab.".into());
            ctx.refresh();
        }
    });

    if let Some(window) = web_sys::window() {
        let _ = window
            .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
    }

    // 泄漏闭包以保持监听器存活
    closure.forget();
}
