#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use serde_json::Value;

use helpers::{location, post_form, CapturedLogs, TestContext};
use tabs::middleware::AdminGrant;
use tabs::tabs::models::EntityKind;

async fn positions(ctx: &TestContext, kind: EntityKind, owner_id: i32) -> Vec<(i32, i32)> {
    ctx.owner_tabs(kind, owner_id)
        .await
        .into_iter()
        .map(|tab| (tab.id, tab.position))
        .collect()
}

async fn seed_three(ctx: &TestContext, kind: EntityKind, owner_id: i32) {
    for id in 1..=3 {
        ctx.seed_tab(kind, id, owner_id, id).await;
    }
}

#[actix_web::test]
async fn test_absolute_move_shifts_siblings() {
    let ctx = TestContext::new().await;
    seed_three(&ctx, EntityKind::Product, 42).await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/position",
        &[("product_id", "42"), ("tab_id", "3"), ("mode", "absolute"), ("value", "1")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "http://localhost:8080/admin/products/update?product_id=42&current_tab=modules"
    );
    assert_eq!(positions(&ctx, EntityKind::Product, 42).await, vec![(3, 1), (1, 2), (2, 3)]);
    assert_eq!(ctx.events.names(), vec!["tabs.product.position"]);
}

#[actix_web::test]
async fn test_up_and_down_on_folder_tabs() {
    let ctx = TestContext::new().await;
    seed_three(&ctx, EntityKind::Folder, 7).await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/position",
        &[("folder_id", "7"), ("tab_id", "2"), ("mode", "up")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "http://localhost:8080/admin/folders/update/7?current_tab=modules#modules"
    );
    assert_eq!(positions(&ctx, EntityKind::Folder, 7).await, vec![(2, 1), (1, 2), (3, 3)]);

    let req = post_form(
        "/admin/module/tabs/position",
        &[("folder_id", "7"), ("tab_id", "2"), ("mode", "down")],
    )
    .to_request();
    test::call_service(&app, req).await;
    assert_eq!(positions(&ctx, EntityKind::Folder, 7).await, vec![(1, 1), (2, 2), (3, 3)]);
}

#[actix_web::test]
async fn test_position_alias_and_clamping() {
    let ctx = TestContext::new().await;
    seed_three(&ctx, EntityKind::Content, 9).await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/position",
        &[("content_id", "9"), ("tab_id", "1"), ("position", "40")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(positions(&ctx, EntityKind::Content, 9).await, vec![(2, 1), (3, 2), (1, 3)]);
}

#[actix_web::test]
async fn test_owner_parameter_order_picks_product_first() {
    let ctx = TestContext::new().await;
    seed_three(&ctx, EntityKind::Product, 42).await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/position",
        &[("content_id", "9"), ("product_id", "42"), ("tab_id", "1"), ("mode", "down")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert!(location(&resp).contains("/admin/products/update?product_id=42"));
    assert_eq!(positions(&ctx, EntityKind::Product, 42).await, vec![(2, 1), (1, 2), (3, 3)]);
}

#[actix_web::test]
async fn test_position_without_owner_is_not_found() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form("/admin/module/tabs/position", &[("tab_id", "1"), ("mode", "up")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Not found: Resource key not found");
}

#[actix_web::test]
async fn test_move_of_missing_tab_renders_error_view() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/position",
        &[("category_id", "3"), ("tab_id", "8"), ("mode", "up")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["general_error"], "8 tab id does not exist");
    assert_eq!(body["template"], "category-edit");
    assert!(body["form"].is_null());
    assert!(logs
        .contents()
        .contains("Error during tabs category position process : 8 tab id does not exist."));
}

#[actix_web::test]
async fn test_init_position_renumbers_products_idempotently() {
    let ctx = TestContext::new().await;
    for (id, owner_id, position) in [(1, 42, 9), (2, 42, 4), (3, 42, 4), (4, 43, 0), (5, 43, 12)] {
        ctx.seed_tab(EntityKind::Product, id, owner_id, position).await;
    }
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let expected_42 = vec![(2, 1), (3, 2), (1, 3)];
    let expected_43 = vec![(4, 1), (5, 2)];

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/admin/module/tabs/init-position")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["template"], "tabs-config");
        assert_eq!(body["arguments"]["renumbered_owners"], "2");
        assert_eq!(positions(&ctx, EntityKind::Product, 42).await, expected_42);
        assert_eq!(positions(&ctx, EntityKind::Product, 43).await, expected_43);
    }
}

#[actix_web::test]
async fn test_config_page() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = test::TestRequest::get().uri("/admin/module/tabs/config").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["template"], "tabs-config");
}
