use super::*;
use crate::pattern::Params;
use crate::route::names;
use rstest::rstest;
use std::cell::{Cell, RefCell};

fn guard(authenticated: bool) -> NavigationGuard<impl AuthStateProvider> {
    let table = Arc::new(RouteTable::orgtracker().unwrap());
    NavigationGuard::new(table, move || authenticated)
}

/// 为每条路由生成一个能命中它的完整路径
fn sample_paths(table: &RouteTable) -> Vec<(String, String)> {
    let params = Params::new()
        .with("slug", "acme")
        .with("pathMatch", "unknown/x/y");
    table
        .routes()
        .map(|route| {
            let path = route.pattern().build(&params).unwrap();
            (route.name().to_string(), path)
        })
        .collect()
}

// =========================================================
// 场景
// =========================================================

#[test]
fn test_profile_without_token_redirects_to_login() {
    let guard = guard(false);
    let to = guard.table().resolve("/profile");
    let outcome = guard.check(&to, None);

    let GuardOutcome::Redirect(redirect) = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(redirect.name, names::LOGIN);
    assert_eq!(redirect.reason, RedirectReason::Unauthenticated);
    assert_eq!(
        redirect.location(guard.table()).full_path(),
        "/login?redirect=%2Fprofile"
    );
}

#[test]
fn test_redirect_query_keeps_full_path_verbatim() {
    let guard = guard(false);
    let to = guard.table().resolve("/followed?sort=name&page=2#list");
    let GuardOutcome::Redirect(redirect) = guard.check(&to, None) else {
        panic!("expected redirect");
    };
    assert_eq!(
        redirect.query.get(REDIRECT_QUERY_KEY),
        Some("/followed?sort=name&page=2#list")
    );
}

#[rstest]
#[case("/followed?next=/x")]
#[case("/profile?flag")]
#[case("/profile?q=a+b")]
#[case("/profile?tab=%2fsettings")]
fn test_redirect_query_does_not_reencode_request(#[case] requested: &str) {
    let guard = guard(false);
    let to = guard.table().resolve(requested);
    let GuardOutcome::Redirect(redirect) = guard.check(&to, None) else {
        panic!("expected redirect");
    };
    assert_eq!(redirect.query.get(REDIRECT_QUERY_KEY), Some(requested));

    let login = guard.table().resolve_location(redirect.location(guard.table()));
    assert_eq!(login.location().query().get(REDIRECT_QUERY_KEY), Some(requested));
}

#[test]
fn test_login_with_token_redirects_home() {
    let guard = guard(true);
    let to = guard.table().resolve("/login");
    let GuardOutcome::Redirect(redirect) = guard.check(&to, None) else {
        panic!("expected redirect");
    };
    assert_eq!(redirect.name, names::ORGANIZATION_LIST);
    assert_eq!(redirect.reason, RedirectReason::AlreadyAuthenticated);
    assert!(redirect.query.is_empty());
    assert_eq!(redirect.location(guard.table()).full_path(), "/");
}

#[rstest]
fn test_not_found_and_detail_always_allowed(#[values(true, false)] authenticated: bool) {
    let guard = guard(authenticated);

    let to = guard.table().resolve("/unknown/x/y");
    assert_eq!(to.name(), names::NOT_FOUND);
    assert_eq!(guard.check(&to, None), GuardOutcome::Allow);

    let to = guard.table().resolve("/organizations/acme");
    assert_eq!(to.name(), names::ORGANIZATION_DETAIL);
    assert_eq!(to.params().get("slug"), Some("acme"));
    assert_eq!(guard.check(&to, None), GuardOutcome::Allow);
}

// =========================================================
// 全路由性质
// =========================================================

#[rstest]
fn test_guard_properties_hold_for_every_route(#[values(true, false)] authenticated: bool) {
    let guard = guard(authenticated);
    let table = Arc::clone(guard.table());

    for (name, path) in sample_paths(&table) {
        let to = table.resolve(&path);
        assert_eq!(to.name(), name, "{} should resolve to {}", path, name);

        let outcome = guard.check(&to, None);
        let meta = to.meta();
        match outcome {
            GuardOutcome::Redirect(redirect) if meta.requires_auth => {
                assert!(!authenticated);
                assert_eq!(redirect.name, names::LOGIN);
                assert_eq!(redirect.query.get(REDIRECT_QUERY_KEY), Some(path.as_str()));
            }
            GuardOutcome::Redirect(redirect) if meta.guest_only => {
                assert!(authenticated);
                assert_eq!(redirect.name, names::ORGANIZATION_LIST);
                assert!(redirect.query.is_empty());
            }
            GuardOutcome::Allow => {
                assert!(!(meta.requires_auth && !authenticated));
                assert!(!(meta.guest_only && authenticated));
            }
            other => panic!("unexpected outcome for {}: {:?}", name, other),
        }
    }
}

#[test]
fn test_redirect_targets_satisfy_guard() {
    for authenticated in [true, false] {
        let guard = guard(authenticated);
        let table = Arc::clone(guard.table());
        for (_, path) in sample_paths(&table) {
            if let GuardOutcome::Redirect(redirect) = guard.check(&table.resolve(&path), None) {
                let target = table.resolve_location(redirect.location(&table));
                assert_eq!(guard.check(&target, None), GuardOutcome::Allow);
            }
        }
    }
}

#[test]
fn test_auth_is_read_once_per_check() {
    let reads = Cell::new(0);
    let table = Arc::new(RouteTable::orgtracker().unwrap());
    let guard = NavigationGuard::new(Arc::clone(&table), || {
        reads.set(reads.get() + 1);
        false
    });
    guard.check(&table.resolve("/profile"), None);
    guard.check(&table.resolve("/"), Some(&table.resolve("/profile")));
    assert_eq!(reads.get(), 2);
}

// =========================================================
// TokenAuth
// =========================================================

struct MockStore {
    result: Result<Option<String>, StorageError>,
    keys: RefCell<Vec<String>>,
}

impl MockStore {
    fn new(result: Result<Option<String>, StorageError>) -> Self {
        Self {
            result,
            keys: RefCell::new(Vec::new()),
        }
    }
}

impl TokenStore for &MockStore {
    fn read_token(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.keys.borrow_mut().push(key.to_string());
        self.result.clone()
    }
}

#[rstest]
#[case(Ok(Some("abc".to_string())), true)]
#[case(Ok(Some(String::new())), false)]
#[case(Ok(None), false)]
#[case(Err(StorageError::Unavailable("no window".to_string())), false)]
fn test_token_auth(
    #[case] result: Result<Option<String>, StorageError>,
    #[case] expected: bool,
) {
    let store = MockStore::new(result);
    let auth = TokenAuth::new(&store, "token");
    assert_eq!(auth.is_authenticated(), expected);
    assert_eq!(store.keys.borrow().as_slice(), ["token".to_string()]);
}

#[test]
fn test_storage_failure_fails_closed_on_protected_route() {
    let store = MockStore::new(Err(StorageError::Read {
        key: "token".to_string(),
        reason: "SecurityError".to_string(),
    }));
    let table = Arc::new(RouteTable::orgtracker().unwrap());
    let guard = NavigationGuard::new(Arc::clone(&table), TokenAuth::new(&store, "token"));
    assert!(matches!(
        guard.check(&table.resolve("/profile"), None),
        GuardOutcome::Redirect(Redirect {
            reason: RedirectReason::Unauthenticated,
            ..
        })
    ));
}
