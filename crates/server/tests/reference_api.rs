mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{app_with_admin, send, token_with};

#[tokio::test]
async fn test_prison_crud_flow() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(
        &state,
        &["Permissions.Prisons.View", "Permissions.Prisons.Create", "Permissions.Prisons.Edit", "Permissions.Prisons.Delete"],
    );

    let kober = json!({"name": "Kober", "code": "KB-01", "location": "Khartoum North", "capacity": 1200});
    let (status, created) = send(&app, "POST", "/prisons", Some(&token), Some(kober.clone())).await?;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, "POST", "/prisons", Some(&token), Some(kober)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let moved = json!({"name": "Kober", "code": "KB-01", "location": "Bahri", "capacity": 1500});
    let (status, updated) = send(&app, "PUT", &format!("/prisons/{id}"), Some(&token), Some(moved)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "Bahri");
    assert_eq!(updated["id"], id);

    let (status, list) = send(&app, "GET", "/prisons", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/prisons/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/prisons/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_reference_validation_and_permissions() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let courts = token_with(&state, &["Permissions.Courts.View", "Permissions.Courts.Create"]);

    let (status, _) = send(&app, "POST", "/courts", Some(&courts), Some(json!({"name": " ", "location": "Omdurman"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, court) =
        send(&app, "POST", "/courts", Some(&courts), Some(json!({"name": "High Court", "location": "Omdurman"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = court["id"].as_i64().unwrap();

    // View and Create do not grant Delete
    let (status, _) = send(&app, "DELETE", &format!("/courts/{id}"), Some(&courts), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Court permissions say nothing about managements
    let (status, _) = send(&app, "GET", "/managements", Some(&courts), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mgmt = token_with(&state, &["Permissions.Managements.Create"]);
    let (status, created) = send(&app, "POST", "/managements", Some(&mgmt), Some(json!({"name": "Central"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["description"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_reference_rejections_use_error_body() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &["Permissions.Prisons.View", "Permissions.Prisons.Create"]);

    let (status, body) = send(&app, "POST", "/prisons", Some(&token), Some(json!({"name": "Kober"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, body) = send(&app, "GET", "/prisons/not-a-number", Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, body) = send(&app, "GET", "/prisons?per_page=lots", Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    Ok(())
}
