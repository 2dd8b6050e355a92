//! document.title 输出

use orgtracker_router::TitleSink;

/// 把路由标题写到 `document.title`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTitle;

impl TitleSink for DocumentTitle {
    fn set_title(&self, title: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(title);
        }
    }
}
