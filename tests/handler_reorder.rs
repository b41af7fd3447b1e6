mod common;

use axum::http::StatusCode;
use common::{TestApp, test_app};
use serde_json::{Value, json};

struct Apartment {
    app: TestApp,
    token: String,
    base: String,
    anna: i64,
    jon: i64,
    gunnar: i64,
}

/// Apartment 2 with Anna (0), Jón (1) and Gunnar (no priority).
async fn apartment() -> Apartment {
    let app = test_app().await;
    let building = app.store.add_building("Hátún 10");
    let anna = app.store.add_resident(building, "2", "Anna", Some(0));
    let jon = app.store.add_resident(building, "2", "Jón", Some(1));
    let gunnar = app.store.add_resident(building, "2", "Gunnar", None);
    app.store.add_resident(building, "3", "Sigga", None);
    let token = app.login().await;

    Apartment {
        app,
        token,
        base: format!("/api/buildings/{building}/apartments/2/reorder"),
        anna,
        jon,
        gunnar,
    }
}

fn order(body: &Value) -> Vec<String> {
    body["residents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

impl Apartment {
    async fn get(&self) -> axum_test::TestResponse {
        self.app
            .server
            .get(&self.base)
            .add_header("Authorization", TestApp::bearer(&self.token))
            .await
    }

    async fn begin(&self) -> axum_test::TestResponse {
        self.app
            .server
            .post(&self.base)
            .add_header("Authorization", TestApp::bearer(&self.token))
            .await
    }

    async fn move_resident(&self, from: usize, to: usize) -> axum_test::TestResponse {
        self.app
            .server
            .post(&format!("{}/moves", self.base))
            .add_header("Authorization", TestApp::bearer(&self.token))
            .json(&json!({ "from": from, "to": to }))
            .await
    }

    async fn save(&self) -> axum_test::TestResponse {
        self.app
            .server
            .post(&format!("{}/save", self.base))
            .add_header("Authorization", TestApp::bearer(&self.token))
            .await
    }

    async fn cancel(&self) -> axum_test::TestResponse {
        self.app
            .server
            .delete(&self.base)
            .add_header("Authorization", TestApp::bearer(&self.token))
            .await
    }

    fn priority(&self, id: i64) -> Option<u32> {
        self.app.store.resident(id).unwrap().priority
    }
}

#[tokio::test]
async fn test_view_shows_persisted_order() {
    let apt = apartment().await;

    let response = apt.get().await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["state"], "viewing");
    assert_eq!(body["dirty"], false);
    assert_eq!(order(&body), vec!["Anna", "Jón", "Gunnar"]);
}

#[tokio::test]
async fn test_view_unknown_apartment() {
    let apt = apartment().await;

    apt.app
        .server
        .get(&apt.base.replace("/2/", "/99/"))
        .add_header("Authorization", TestApp::bearer(&apt.token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_move_and_save_persists_positions() {
    let apt = apartment().await;

    let response = apt.begin().await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["state"], "editing");

    let response = apt.move_resident(2, 0).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["dirty"], true);
    assert_eq!(order(&body), vec!["Gunnar", "Anna", "Jón"]);

    let response = apt.save().await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["state"], "viewing");
    assert_eq!(body["dirty"], false);
    assert_eq!(order(&body), vec!["Gunnar", "Anna", "Jón"]);

    assert_eq!(apt.priority(apt.gunnar), Some(0));
    assert_eq!(apt.priority(apt.anna), Some(1));
    assert_eq!(apt.priority(apt.jon), Some(2));

    let body = apt.get().await.json::<Value>();
    assert_eq!(body["state"], "viewing");
    assert_eq!(order(&body), vec!["Gunnar", "Anna", "Jón"]);
}

#[tokio::test]
async fn test_save_without_moves_normalizes_priorities() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();

    apt.save().await.assert_status_ok();

    assert_eq!(apt.priority(apt.anna), Some(0));
    assert_eq!(apt.priority(apt.jon), Some(1));
    assert_eq!(apt.priority(apt.gunnar), Some(2));
}

#[tokio::test]
async fn test_begin_twice_conflicts() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();

    apt.begin().await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_without_editing_conflicts() {
    let apt = apartment().await;

    apt.move_resident(0, 1).await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_out_of_range() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();

    apt.move_resident(0, 3).await.assert_status_bad_request();

    let body = apt.get().await.json::<Value>();
    assert_eq!(body["dirty"], false);
    assert_eq!(order(&body), vec!["Anna", "Jón", "Gunnar"]);
}

#[tokio::test]
async fn test_cancel_discards_working_copy() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();
    apt.move_resident(0, 2).await.assert_status_ok();

    let response = apt.cancel().await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["state"], "viewing");
    assert_eq!(order(&body), vec!["Anna", "Jón", "Gunnar"]);
    assert_eq!(apt.priority(apt.anna), Some(0));
    assert_eq!(apt.priority(apt.gunnar), None);
}

#[tokio::test]
async fn test_partial_save_keeps_editing_and_can_retry() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();
    apt.move_resident(2, 0).await.assert_status_ok();
    apt.app.store.fail_updates_for(apt.anna);

    let response = apt.save().await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["error"]["code"], "partial_save");

    let body = apt.get().await.json::<Value>();
    assert_eq!(body["state"], "editing");
    assert_eq!(body["dirty"], true);
    assert!(body["last_error"].as_str().is_some());
    assert_eq!(order(&body), vec!["Gunnar", "Anna", "Jón"]);

    apt.app.store.heal_updates();
    apt.save().await.assert_status_ok();

    assert_eq!(apt.priority(apt.gunnar), Some(0));
    assert_eq!(apt.priority(apt.anna), Some(1));
    assert_eq!(apt.priority(apt.jon), Some(2));
}

#[tokio::test]
async fn test_save_refused_when_apartment_changed() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();
    let building = apt.app.store.resident(apt.anna).unwrap().building_id;
    apt.app.store.add_resident(building, "2", "Nýr", None);

    let response = apt.save().await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(apt.priority(apt.gunnar), None);
    assert_eq!(apt.get().await.json::<Value>()["state"], "editing");
}

#[tokio::test]
async fn test_drafts_are_per_session() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();
    apt.move_resident(2, 0).await.assert_status_ok();
    let other_token = apt.app.login().await;

    let response = apt
        .app
        .server
        .get(&apt.base)
        .add_header("Authorization", TestApp::bearer(&other_token))
        .await;

    let body = response.json::<Value>();
    assert_eq!(body["state"], "viewing");
    assert_eq!(order(&body), vec!["Anna", "Jón", "Gunnar"]);
}

#[tokio::test]
async fn test_logout_discards_drafts() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();

    apt.app
        .server
        .post("/api/auth/logout")
        .add_header("Authorization", TestApp::bearer(&apt.token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let health = apt.app.server.get("/health").await.json::<Value>();
    assert_eq!(health["checks"]["reorder_drafts"]["message"], "0 in progress");
}

#[tokio::test]
async fn test_expired_session_discards_drafts() {
    let apt = apartment().await;
    apt.begin().await.assert_status_ok();
    apt.app.accounts.expire_all_sessions();

    let response = apt
        .app
        .server
        .get(&apt.base)
        .add_header("Authorization", TestApp::bearer(&apt.token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "session_expired");
    let health = apt.app.server.get("/health").await.json::<Value>();
    assert_eq!(health["checks"]["reorder_drafts"]["message"], "0 in progress");
}
