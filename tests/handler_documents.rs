mod common;

use axum::http::StatusCode;
use common::{FailingRenderer, TestApp, TestAppBuilder, test_app};
use resident_registry::domain::pagination::LabelLayout;
use serde_json::Value;
use std::num::NonZeroUsize;

async fn building_with_residents(app: &TestApp) -> i64 {
    let building = app.store.add_building("Hátún 10");
    app.store.add_resident(building, "10", "Þóra", None);
    app.store.add_resident(building, "2", "Jón", Some(1));
    app.store.add_resident(building, "2", "Anna", Some(0));
    let hidden = app.store.add_resident(building, "3", "Leynd", None);
    app.store.exclude_from_directory(hidden);
    building
}

#[tokio::test]
async fn test_directory_as_json_is_alphabetical() {
    let app = test_app().await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/documents/directory?format=json"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "resident_directory");
    assert_eq!(body["building_title"], "Hátún 10");
    assert_eq!(body["body"]["type"], "directory");
    let names: Vec<&str> = body["body"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anna", "Jón", "Þóra"]);
}

#[tokio::test]
async fn test_labels_paginate_by_layout() {
    let app = TestAppBuilder::default()
        .layout(LabelLayout::new(
            NonZeroUsize::new(1).unwrap(),
            NonZeroUsize::new(2).unwrap(),
        ))
        .build()
        .await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/documents/labels?format=json"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    let sheets = body["body"]["sheets"].as_array().unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0]["number"], 1);
    assert_eq!(sheets[0]["labels"][0]["apartment_number"], "2");
    assert_eq!(sheets[0]["labels"][0]["names"][0], "Anna");
    assert_eq!(sheets[0]["labels"][0]["names"][1], "Jón");
    assert_eq!(sheets[0]["labels"][1]["apartment_number"], "3");
    assert_eq!(sheets[1]["labels"][0]["apartment_number"], "10");
}

#[tokio::test]
async fn test_rendered_document_headers() {
    let app = test_app().await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/documents/labels?download=true"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"hatun-10-postkassamerki-"));
    assert!(response.text().contains("class=\"label\""));
}

#[tokio::test]
async fn test_empty_building_renders_message() {
    let app = test_app().await;
    let building = app.store.add_building("Tómt hús");
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/documents/directory"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Engar upplýsingar um íbúa fundust."));
}

#[tokio::test]
async fn test_single_apartment_label() {
    let app = test_app().await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/apartments/2/label?format=json"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "apartment_label");
    let label = &body["body"]["sheets"][0]["labels"][0];
    assert_eq!(label["apartment_number"], "2");
    assert_eq!(label["names"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_document_kind() {
    let app = test_app().await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    app.server
        .get(&format!("/api/buildings/{building}/documents/invoice"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_render_failure() {
    let app = TestAppBuilder::default()
        .renderer(FailingRenderer)
        .build()
        .await;
    let building = building_with_residents(&app).await;
    let token = app.login().await;

    let response = app
        .server
        .get(&format!("/api/buildings/{building}/documents/directory"))
        .add_header("Authorization", TestApp::bearer(&token))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"]["code"], "render_error");
}
