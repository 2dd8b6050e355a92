use super::*;
use rstest::rstest;

fn table() -> RouteTable {
    RouteTable::orgtracker().unwrap()
}

fn meta() -> RouteMetadata {
    RouteMetadata::default()
}

/// 最小可用路由表，方便各校验用例在此基础上追加
fn minimal() -> RouteTableBuilder {
    RouteTable::builder()
        .route(names::ORGANIZATION_LIST, "/", View::OrganizationList, meta())
        .route(names::LOGIN, "/login", View::LoginForm, meta().guest_only())
        .route(names::NOT_FOUND, "/:pathMatch(.*)*", View::NotFound, meta())
}

// =========================================================
// 解析
// =========================================================

#[rstest]
#[case("/", names::ORGANIZATION_LIST)]
#[case("/organizations/acme", names::ORGANIZATION_DETAIL)]
#[case("/login", names::LOGIN)]
#[case("/login/", names::LOGIN)]
#[case("/register?from=nav", names::REGISTER)]
#[case("/profile", names::USER_PROFILE)]
#[case("/followed#top", names::FOLLOWED_ORGANIZATIONS)]
#[case("/unknown/x/y", names::NOT_FOUND)]
#[case("/organizations", names::NOT_FOUND)]
#[case("/organizations/acme/members", names::NOT_FOUND)]
fn test_resolve(#[case] path: &str, #[case] expected: &str) {
    let resolved = table().resolve(path);
    assert_eq!(resolved.name(), expected);
    assert_eq!(resolved.is_fallback(), expected == names::NOT_FOUND);
}

#[test]
fn test_resolve_extracts_slug() {
    let resolved = table().resolve("/organizations/acme");
    assert_eq!(resolved.view(), View::OrganizationDetail);
    assert_eq!(resolved.params().get("slug"), Some("acme"));
    assert_eq!(resolved.full_path(), "/organizations/acme");
}

#[test]
fn test_resolve_catch_all_captures_path() {
    let resolved = table().resolve("/unknown/x/y?q=1");
    assert_eq!(resolved.view(), View::NotFound);
    assert_eq!(resolved.params().get("pathMatch"), Some("unknown/x/y"));
    assert_eq!(resolved.location().query().get("q"), Some("1"));
}

#[test]
fn test_resolve_is_idempotent() {
    let table = table();
    for path in ["/", "/profile", "/organizations/acme", "/nope"] {
        assert_eq!(table.resolve(path), table.resolve(path));
    }
}

#[test]
fn test_catch_all_sorts_last_regardless_of_registration_order() {
    let table = RouteTable::builder()
        .route(names::NOT_FOUND, "/:pathMatch(.*)*", View::NotFound, meta())
        .route(names::ORGANIZATION_LIST, "/", View::OrganizationList, meta())
        .route(names::LOGIN, "/login", View::LoginForm, meta())
        .build()
        .unwrap();

    assert_eq!(table.resolve("/login").name(), names::LOGIN);
    assert_eq!(table.resolve("/").name(), names::ORGANIZATION_LIST);
    assert_eq!(table.routes().last().unwrap().name(), names::NOT_FOUND);
    assert_eq!(table.not_found_route().name(), names::NOT_FOUND);
}

#[test]
fn test_first_match_wins_for_overlapping_patterns() {
    let table = minimal()
        .route("OrganizationCreate", "/organizations/new", View::OrganizationDetail, meta())
        .route(names::ORGANIZATION_DETAIL, "/organizations/:slug", View::OrganizationDetail, meta())
        .build()
        .unwrap();

    assert_eq!(table.resolve("/organizations/new").name(), "OrganizationCreate");
    assert_eq!(table.resolve("/organizations/acme").name(), names::ORGANIZATION_DETAIL);
}

// =========================================================
// 构建期校验
// =========================================================

#[test]
fn test_orgtracker_table_shape() {
    let table = table();
    assert_eq!(table.routes().count(), 7);
    assert_eq!(table.login_route().name(), names::LOGIN);
    assert_eq!(table.home_route().name(), names::ORGANIZATION_LIST);
    assert!(table.get(names::USER_PROFILE).unwrap().requires_auth());
    assert!(table.get(names::REGISTER).unwrap().guest_only());
    assert!(table.get("Missing").is_none());
}

#[test]
fn test_duplicate_name_rejected() {
    let err = minimal()
        .route(names::LOGIN, "/signin", View::LoginForm, meta())
        .build()
        .unwrap_err();
    assert_eq!(err, RouterError::DuplicateRoute(names::LOGIN.to_string()));
}

#[test]
fn test_shadowed_pattern_rejected() {
    let err = minimal()
        .route("A", "/organizations/:slug", View::OrganizationDetail, meta())
        .route("B", "/organizations/:id", View::OrganizationDetail, meta())
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::AmbiguousPattern { ref earlier, ref later, .. } if earlier == "A" && later == "B"));
}

#[test]
fn test_static_route_after_param_route_rejected() {
    let err = minimal()
        .route(names::ORGANIZATION_DETAIL, "/organizations/:slug", View::OrganizationDetail, meta())
        .route("NewOrganization", "/organizations/new", View::OrganizationDetail, meta())
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::AmbiguousPattern { ref later, .. } if later == "NewOrganization"));

    let table = minimal()
        .route("NewOrganization", "/organizations/new", View::OrganizationDetail, meta())
        .route(names::ORGANIZATION_DETAIL, "/organizations/:slug", View::OrganizationDetail, meta())
        .build()
        .unwrap();
    assert_eq!(table.resolve("/organizations/new").name(), "NewOrganization");
    assert_eq!(table.resolve("/organizations/acme").name(), names::ORGANIZATION_DETAIL);
}

#[test]
fn test_catch_all_cardinality() {
    let err = RouteTable::builder()
        .route(names::ORGANIZATION_LIST, "/", View::OrganizationList, meta())
        .route(names::LOGIN, "/login", View::LoginForm, meta())
        .build()
        .unwrap_err();
    assert_eq!(err, RouterError::MissingCatchAll);

    let err = minimal()
        .route("Other", "/:rest(.*)*", View::NotFound, meta())
        .build()
        .unwrap_err();
    assert_eq!(err, RouterError::DuplicateCatchAll("Other".to_string()));
}

#[test]
fn test_invalid_pattern_reported_at_build() {
    let err = minimal()
        .route("Broken", "broken", View::NotFound, meta())
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { .. }));
}

#[test]
fn test_redirect_targets_must_exist() {
    let err = minimal().login_route("SignIn").build().unwrap_err();
    assert_eq!(err, RouterError::UnknownRoute("SignIn".to_string()));
}

#[test]
fn test_conflicting_flags_rejected() {
    let err = minimal()
        .route("Odd", "/odd", View::UserProfile, meta().requires_auth().guest_only())
        .build()
        .unwrap_err();
    assert_eq!(err, RouterError::ConflictingFlags("Odd".to_string()));
}

#[test]
fn test_login_requiring_auth_is_a_redirect_loop() {
    let err = RouteTable::builder()
        .route(names::ORGANIZATION_LIST, "/", View::OrganizationList, meta())
        .route(names::LOGIN, "/login", View::LoginForm, meta().requires_auth())
        .route(names::NOT_FOUND, "/:pathMatch(.*)*", View::NotFound, meta())
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::RedirectLoop { ref route, .. } if route == names::LOGIN));
}

#[test]
fn test_guest_only_home_is_a_redirect_loop() {
    let err = minimal().home_route(names::LOGIN).build().unwrap_err();
    assert!(matches!(err, RouterError::RedirectLoop { ref route, .. } if route == names::LOGIN));
}

#[test]
fn test_redirect_targets_with_parameters_rejected() {
    let err = RouteTable::builder()
        .route(names::ORGANIZATION_LIST, "/", View::OrganizationList, meta())
        .route(names::LOGIN, "/login/:tenant", View::LoginForm, meta().guest_only())
        .route(names::NOT_FOUND, "/:pathMatch(.*)*", View::NotFound, meta())
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { ref pattern, .. } if pattern == "/login/:tenant"));

    let err = minimal()
        .route("Workspace", "/w/:id", View::OrganizationList, meta())
        .home_route("Workspace")
        .build()
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { ref pattern, .. } if pattern == "/w/:id"));

    let err = minimal().home_route(names::NOT_FOUND).build().unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { .. }));
}

#[test]
fn test_redirect_target_paths() {
    let table = table();
    assert_eq!(table.login_path(), "/login");
    assert_eq!(table.home_path(), "/");
}

// =========================================================
// 链接生成与清单
// =========================================================

#[test]
fn test_href_for() {
    let table = table();
    assert_eq!(
        table
            .href_for(names::ORGANIZATION_DETAIL, &Params::new().with("slug", "acme"), Query::new())
            .unwrap(),
        "/organizations/acme"
    );
    assert_eq!(
        table
            .href_for(names::LOGIN, &Params::new(), Query::new().with("redirect", "/profile"))
            .unwrap(),
        "/login?redirect=%2Fprofile"
    );
}

#[test]
fn test_href_for_errors() {
    let table = table();
    assert_eq!(
        table.href_for("Nope", &Params::new(), Query::new()),
        Err(RouterError::UnknownRoute("Nope".to_string()))
    );
    assert_eq!(
        table.href_for(names::ORGANIZATION_DETAIL, &Params::new(), Query::new()),
        Err(RouterError::MissingParameter {
            route: names::ORGANIZATION_DETAIL.to_string(),
            param: "slug".to_string(),
        })
    );
}

#[test]
fn test_manifest_serializes_metadata() {
    let manifest = table().manifest();
    let profile = manifest.iter().find(|r| r.name == names::USER_PROFILE).unwrap();
    let json = serde_json::to_value(profile).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "UserProfile",
            "path": "/profile",
            "view": "UserProfile",
            "meta": { "title": "Profile", "requiresAuth": true, "guestOnly": false }
        })
    );
}

#[rstest]
#[case(Some("Profile"), "Profile - OrgTracker")]
#[case(Some(""), "OrgTracker")]
#[case(None, "OrgTracker")]
fn test_document_title(#[case] title: Option<&str>, #[case] expected: &str) {
    let meta = RouteMetadata {
        title: title.map(str::to_string),
        ..RouteMetadata::default()
    };
    assert_eq!(document_title(&meta, "OrgTracker"), expected);
}
