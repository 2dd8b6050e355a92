//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 读取会话 token，供路由守卫判断认证状态。
//! token 的写入由登录/注销流程负责，这里只读。

use orgtracker_router::{StorageError, TokenStore};

/// 本地存储只读访问
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("无法获取 window 对象".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage 已禁用".to_string()))
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Ok(Some(String))` 如果键存在
    /// - `Ok(None)` 如果键不存在
    /// - `Err` 如果存储不可用或读取失败
    pub fn get(key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

impl TokenStore for LocalStorage {
    fn read_token(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::get(key)
    }
}
