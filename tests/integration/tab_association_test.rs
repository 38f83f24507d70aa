#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use serde_json::Value;

use helpers::{location, post_form, CapturedLogs, TestContext};
use tabs::middleware::AdminGrant;
use tabs::tabs::models::EntityKind;
use tabs::tabs::repositories::TabStore;

const OWNERS: [(EntityKind, i32); 4] = [
    (EntityKind::Product, 42),
    (EntityKind::Category, 3),
    (EntityKind::Content, 9),
    (EntityKind::Folder, 7),
];

#[actix_web::test]
async fn test_create_for_every_owner_type() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    for (kind, owner_id) in OWNERS {
        let uri = format!("/admin/module/tabs/associate/{}/{}", kind, owner_id);
        let req = post_form(&uri, &[("title", "Specs")]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 302, "create for {}", kind);

        let tabs = ctx.owner_tabs(kind, owner_id).await;
        assert_eq!(tabs.len(), 1, "one tab for {}", kind);
        assert_eq!(tabs[0].owner_id, owner_id);
        assert!(location(&resp).contains(&format!("tab_id={}", tabs[0].id)));
    }

    assert_eq!(
        ctx.events.names(),
        vec![
            "tabs.product.create",
            "tabs.category.create",
            "tabs.content.create",
            "tabs.folder.create",
        ]
    );
}

#[actix_web::test]
async fn test_create_for_missing_owner_renders_error_view() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    for (kind, _) in OWNERS {
        let uri = format!("/admin/module/tabs/associate/{}/999", kind);
        let req = post_form(&uri, &[("title", "Specs")]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404, "missing {}", kind);

        let body: Value = test::read_body_json(resp).await;
        let error = body["general_error"].as_str().unwrap();
        assert_eq!(error, format!("999 {} id does not exist", kind));
        assert_eq!(body["form"]["error_message"], error);
        assert_eq!(body["template"], kind.descriptor().edit_template);
        assert!(ctx.owner_tabs(kind, 999).await.is_empty());
        assert!(
            logs.contents().contains(&format!(
                "Error during tabs {} association process : 999 {} id does not exist.",
                kind, kind
            )),
            "error log for {}",
            kind
        );
    }

    assert!(ctx.events.names().is_empty());
}

#[actix_web::test]
async fn test_product_example_uses_store_sequencing() {
    let ctx = TestContext::new().await;
    ctx.seed_tab(EntityKind::Product, 1, 42, 1).await;
    ctx.seed_tab(EntityKind::Product, 2, 42, 2).await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/associate/product/42",
        &[("title", "Specs"), ("locale", "en_US"), ("visible", "1")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "http://localhost:8080/admin/products/update?product_id=42&current_tab=modules&tab_id=3"
    );

    let tab = ctx.tabs.find_pk(EntityKind::Product, 3).await.unwrap().unwrap();
    assert_eq!(tab.owner_id, 42);
    assert_eq!(tab.position, 3);
    assert!(tab.visible);

    let translations = ctx
        .tabs
        .translations(EntityKind::Product, &[3], "en_US")
        .await
        .unwrap();
    assert_eq!(translations[0].title.as_deref(), Some("Specs"));
}

#[actix_web::test]
async fn test_update_keeps_stored_owner() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form("/admin/module/tabs/associate/product/42", &[("title", "Specs")]).to_request();
    test::call_service(&app, req).await;
    let created = ctx.owner_tabs(EntityKind::Product, 42).await.remove(0);

    // The route names product 43, the stored owner is 42
    let tab_id = created.id.to_string();
    let req = post_form(
        "/admin/module/tabs/associate/product/43",
        &[
            ("tab_id", tab_id.as_str()),
            ("title", "Specifications"),
            ("visible", "on"),
            ("product_id", "43"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert!(location(&resp).contains("product_id=42"));

    let updated = ctx.tabs.find_pk(EntityKind::Product, created.id).await.unwrap().unwrap();
    assert_eq!(updated.owner_id, 42);
    assert!(updated.visible);
    assert_eq!(updated.position, created.position);
    assert!(ctx.owner_tabs(EntityKind::Product, 43).await.is_empty());
    assert_eq!(
        ctx.events.names(),
        vec!["tabs.product.create", "tabs.product.update"]
    );
}

#[actix_web::test]
async fn test_update_of_missing_tab() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/associate/folder/7",
        &[("tab_id", "55"), ("title", "Docs")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["general_error"], "55 tab id does not exist");
    assert_eq!(body["template"], "folder-edit");
    assert_eq!(body["arguments"]["folder_id"], "7");
}

#[actix_web::test]
async fn test_invalid_form_keeps_submitted_values() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/associate/content/9",
        &[("title", ""), ("description", "Two years")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["general_error"],
        "Please check your input: title: This value should not be blank."
    );
    assert_eq!(body["form"]["name"], "tabs_content_form");
    assert_eq!(body["form"]["values"]["description"], "Two years");
    assert_eq!(body["template"], "content-edit");
    assert_eq!(body["arguments"]["folder_id"], "7");
    assert_eq!(body["entity"]["title"], "Warranty");
    assert!(ctx.owner_tabs(EntityKind::Content, 9).await.is_empty());
}

#[actix_web::test]
async fn test_store_failure_renders_database_message() {
    let ctx = TestContext::new().await;
    ctx.tabs.fail_writes(true);
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form("/admin/module/tabs/associate/category/3", &[("title", "Specs")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["general_error"], sqlx::Error::PoolClosed.to_string());
    assert_eq!(body["template"], "category-edit");
}

#[actix_web::test]
async fn test_explicit_success_url() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = post_form(
        "/admin/module/tabs/associate/folder/7",
        &[("title", "Docs"), ("success_url", "/admin/folders")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "http://localhost:8080/admin/folders?tab_id=1");
}

#[actix_web::test]
async fn test_listing_returns_translated_tabs() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    for title in ["First", "Second"] {
        let req = post_form(
            "/admin/module/tabs/associate/product/42",
            &[("title", title), ("visible", "yes")],
        )
        .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/admin/module/tabs/list/product/42?order=last_created_first&limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 2);
    assert_eq!(listed[0]["position"], 2);
    assert_eq!(listed[0]["translation"]["title"], "Second");

    let req = test::TestRequest::get()
        .uri("/admin/module/tabs/list/brand/42")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_listing_rejects_day_counts_outside_date_range() {
    let ctx = TestContext::new().await;
    let app = test::init_service(ctx.app(AdminGrant::all())).await;

    let req = test::TestRequest::get()
        .uri("/admin/module/tabs/list/product/42?updated_within_days=200000000")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"]["message"],
        "Validation error: updated_within_days: This value is out of range."
    );

    let req = test::TestRequest::get()
        .uri("/admin/module/tabs/list/product/42?created_within_days=7")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}
