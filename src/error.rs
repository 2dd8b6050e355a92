use thiserror::Error;

/// 路由层错误
///
/// 未匹配路径不是错误（会解析到兜底路由），未认证访问也不是错误（是重定向结果）。
/// 这里只收录路由表构建期的配置错误，以及运行期的链接生成/重定向环路错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// 路径模式无法解析
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 路由名称重复
    #[error("duplicate route name `{0}`")]
    DuplicateRoute(String),

    /// 先注册的显式模式覆盖了后注册的模式，后者永远不会被选中
    #[error("route `{later}` ({pattern}) is shadowed by `{earlier}`")]
    AmbiguousPattern {
        earlier: String,
        later: String,
        pattern: String,
    },

    /// 注册了多个兜底路由
    #[error("catch-all route `{0}` registered twice (only one catch-all allowed)")]
    DuplicateCatchAll(String),

    /// 未注册兜底路由
    #[error("route table has no catch-all route")]
    MissingCatchAll,

    /// 按名称查找的路由不存在
    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    /// 反向生成链接时缺少参数
    #[error("route `{route}` requires parameter `{param}`")]
    MissingParameter { route: String, param: String },

    /// 同时设置了 requires_auth 与 guest_only
    #[error("route `{0}` cannot be both auth-only and guest-only")]
    ConflictingFlags(String),

    /// 重定向目标会再次触发重定向
    #[error("redirect loop via `{route}`: {reason}")]
    RedirectLoop { route: String, reason: String },
}

pub type RouterResult<T> = Result<T, RouterError>;

/// 持久化存储读取失败
///
/// 守卫遇到此错误时按 "未认证" 处理，不会向外传播。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// 存储不可用（无 window、隐私模式禁用 localStorage 等）
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// 读取失败
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
}
