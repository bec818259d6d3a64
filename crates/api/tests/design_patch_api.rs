//! HTTP-level integration tests for `/api/v1/admin/design-patches`.
//!
//! Cards and templates are seeded through the repositories, then patched,
//! inspected and rolled back through the API.

mod common;

use axum::http::StatusCode;
use cardex_core::template::TemplateScope;
use cardex_db::models::card::{Card, CreateCard};
use cardex_db::models::card_template::{CardTemplate, CreateCardTemplate};
use cardex_db::repositories::{AdminPatchRepo, CardRepo, CardTemplateRepo};
use common::{admin_token, body_json, get_auth, post_json, post_json_auth, user_token};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

const PATCHES: &str = "/api/v1/admin/design-patches";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_card(pool: &PgPool, slug: &str) -> Card {
    CardRepo::create(
        pool,
        &CreateCard {
            user_id: Uuid::new_v4(),
            name: format!("Card {slug}"),
            slug: slug.to_string(),
            theme: Some(json!({
                "primaryColor": "#111111",
                "qrSettings": { "data": format!("https://cardex.io/{slug}"), "fgColor": "#000" }
            })),
            product_images: Some(json!([{ "url": "b" }, { "url": "c" }])),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn seed_template(pool: &PgPool) -> CardTemplate {
    CardTemplateRepo::create(
        pool,
        &CreateCardTemplate {
            name: "Spring".to_string(),
            description: None,
            owner_id: Uuid::new_v4(),
            scope: TemplateScope::Global,
            team_id: None,
            layout_data: json!({
                "theme": {
                    "primaryColor": "#ff0000",
                    "qrSettings": { "fgColor": "#00ff00" }
                },
                "productImages": [{ "url": "a" }, { "url": "b" }]
            }),
            source_card_id: None,
        },
    )
    .await
    .unwrap()
}

fn patch_body(template_id: Uuid, card_ids: &[Uuid]) -> Value {
    json!({
        "template_id": template_id,
        "target_mode": "selected",
        "card_ids": card_ids,
        "options": {
            "theme": true,
            "qrTheme": true,
            "carouselProducts": { "images": { "apply": true, "mode": "merge" } }
        }
    })
}

// ---------------------------------------------------------------------------
// Execute, inspect, roll back
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_then_rollback_restores_cards(pool: PgPool) {
    let first = seed_card(&pool, "first").await;
    let second = seed_card(&pool, "second").await;
    let template = seed_template(&pool).await;
    let token = admin_token();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        patch_body(template.id, &[first.id, second.id]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["successIds"].as_array().unwrap().len(), 2);
    let patch_id: Uuid = serde_json::from_value(json["data"]["patchId"].clone()).unwrap();

    let patched = CardRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(patched.design_version, first.design_version + 1);
    assert_eq!(patched.last_design_patch_id, Some(patch_id));
    assert_eq!(patched.theme["primaryColor"], "#ff0000");
    assert_eq!(patched.theme["qrSettings"]["fgColor"], "#00ff00");
    assert_eq!(patched.theme["qrSettings"]["data"], "https://cardex.io/first");
    let urls: Vec<&str> = patched
        .product_images
        .as_array()
        .unwrap()
        .iter()
        .map(|image| image["url"].as_str().unwrap())
        .collect();
    assert_eq!(urls, ["b", "c", "a"]);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("{PATCHES}/{patch_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let record = body_json(response).await;
    assert_eq!(record["data"]["status"], "completed");
    assert_eq!(record["data"]["cards_affected"], 2);
    assert_eq!(record["data"]["target_mode"], "selected");
    assert!(record["data"]["before_states"][first.id.to_string()].is_object());

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{PATCHES}/{patch_id}/rollback"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "rolled_back");
    assert_eq!(json["data"]["restoredIds"].as_array().unwrap().len(), 2);

    let restored = CardRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(restored.theme, first.theme);
    assert_eq!(restored.product_images, first.product_images);
    assert_eq!(restored.design_version, first.design_version);
    assert!(restored.last_design_patch_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_rollback_is_rejected(pool: PgPool) {
    let card = seed_card(&pool, "twice").await;
    let template = seed_template(&pool).await;
    let token = admin_token();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        patch_body(template.id, &[card.id]),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let patch_id = json["data"]["patchId"].as_str().unwrap().to_string();
    let rollback_uri = format!("{PATCHES}/{patch_id}/rollback");

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        &rollback_uri,
        json!({}),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second =
        post_json_auth(common::build_test_app(pool), &rollback_uri, json!({}), &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "INVALID_STATE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_unknown_patch_returns_404(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("{PATCHES}/{}/rollback", Uuid::new_v4()),
        json!({}),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_target_mode_all_patches_every_card(pool: PgPool) {
    for slug in ["a1", "a2", "a3"] {
        seed_card(&pool, slug).await;
    }
    let template = seed_template(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        json!({
            "template_id": template.id,
            "target_mode": "all",
            "options": { "theme": true }
        }),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["successIds"].as_array().unwrap().len(), 3);

    let patches = AdminPatchRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].target_mode, "all");
    assert_eq!(patches[0].cards_affected, 3);
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_preview_writes_nothing(pool: PgPool) {
    let card = seed_card(&pool, "preview").await;
    let template = seed_template(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{PATCHES}/preview"),
        patch_body(template.id, &[card.id]),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let previews = json["data"].as_array().unwrap();
    assert_eq!(previews.len(), 1);
    assert!(previews[0]["payload"].is_object());

    let unchanged = CardRepo::find_by_id(&pool, card.id).await.unwrap().unwrap();
    assert_eq!(unchanged.design_version, card.design_version);
    assert!(AdminPatchRepo::list(&pool, 10, 0).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_requires_token(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        PATCHES,
        patch_body(Uuid::new_v4(), &[Uuid::new_v4()]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_requires_admin(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        PATCHES,
        patch_body(Uuid::new_v4(), &[Uuid::new_v4()]),
        &user_token(Uuid::new_v4(), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_without_selection_returns_400(pool: PgPool) {
    let card = seed_card(&pool, "nothing").await;
    let template = seed_template(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        json!({
            "template_id": template.id,
            "target_mode": "selected",
            "card_ids": [card.id],
            "options": {}
        }),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(AdminPatchRepo::list(&pool, 10, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_with_unknown_card_returns_400(pool: PgPool) {
    let card = seed_card(&pool, "known").await;
    let template = seed_template(&pool).await;
    let unknown = Uuid::new_v4();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        patch_body(template.id, &[card.id, unknown]),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains(&unknown.to_string()));
    assert!(AdminPatchRepo::list(&pool, 10, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_with_duplicate_card_returns_400(pool: PgPool) {
    let card = seed_card(&pool, "dup").await;
    let template = seed_template(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PATCHES,
        patch_body(template.id, &[card.id, card.id]),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_with_deactivated_template_returns_400(pool: PgPool) {
    let card = seed_card(&pool, "inactive").await;
    let template = seed_template(&pool).await;
    CardTemplateRepo::deactivate(&pool, template.id).await.unwrap();

    let response = post_json_auth(
        common::build_test_app(pool),
        PATCHES,
        patch_body(template.id, &[card.id]),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_patches_rejects_unknown_status(pool: PgPool) {
    let response = get_auth(
        common::build_test_app(pool),
        &format!("{PATCHES}?status=pending"),
        &admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
