//! 路由视图占位
//!
//! 真实页面（组织列表、详情、登录、注册、个人资料）由视图层提供，
//! 这里只渲染标识当前路由的骨架，方便验证路由与守卫行为。

use crate::auth::use_auth;
use crate::web::router::Link;
use leptos::prelude::*;
use orgtracker_router::{ResolvedRoute, View, names};

#[component]
fn PageShell(
    #[prop(into)] heading: String,
    #[prop(optional_no_strip)] detail: Option<String>,
) -> impl IntoView {
    let is_authenticated = use_auth().is_authenticated_signal();

    view! {
        <div class="min-h-screen bg-base-200">
            <nav class="navbar bg-base-100 shadow gap-2">
                <Link to=names::ORGANIZATION_LIST>"Organizations"</Link>
                <Show
                    when=move || is_authenticated.get()
                    fallback=|| view! {
                        <Link to=names::LOGIN>"Login"</Link>
                        <Link to=names::REGISTER>"Register"</Link>
                    }
                >
                    <Link to=names::FOLLOWED_ORGANIZATIONS>"Followed"</Link>
                    <Link to=names::USER_PROFILE>"Profile"</Link>
                </Show>
            </nav>
            <main class="p-8">
                <h1 class="text-3xl font-bold">{heading}</h1>
                {detail.map(|d| view! { <p class="mt-4 text-base-content/70">{d}</p> })}
            </main>
        </div>
    }
}

/// 路由匹配函数
///
/// 根据路由的视图标识返回对应的页面。
pub fn route_matcher(route: &ResolvedRoute) -> AnyView {
    let heading = route.meta().title.clone().unwrap_or_default();
    match route.view() {
        View::OrganizationDetail => {
            let slug = route.params().get("slug").unwrap_or_default().to_string();
            view! { <PageShell heading=heading detail=Some(slug) /> }.into_any()
        }
        View::LoginForm => {
            let redirect = route
                .location()
                .query()
                .get(orgtracker_router::REDIRECT_QUERY_KEY)
                .map(|target| format!("After signing in you will return to {}", target));
            view! { <PageShell heading=heading detail=redirect /> }.into_any()
        }
        View::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">{heading}</p>
                </div>
            </div>
        }
        .into_any(),
        View::OrganizationList
        | View::RegisterForm
        | View::UserProfile
        | View::FollowedOrganizations => view! { <PageShell heading=heading /> }.into_any(),
    }
}
