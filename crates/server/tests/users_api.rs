mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};

use support::{app_with_admin, login, send, token_with, ADMIN_EMAIL, ADMIN_PASSWORD};

fn user_body(email: &str) -> Value {
    json!({
        "first_name": "Amina",
        "last_name": "Yusuf",
        "email": email,
        "phone_number": "+249 912 345 678"
    })
}

const ALL_USER_PERMS: [&str; 4] = [
    "Permissions.Users.View",
    "Permissions.Users.Create",
    "Permissions.Users.Edit",
    "Permissions.Users.Delete",
];

#[tokio::test]
async fn test_user_crud_flow() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);

    let (status, created) = send(&app, "POST", "/users", Some(&token), Some(user_body("Amina@Example.com"))).await?;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, user) = send(&app, "GET", &format!("/users/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "amina@example.com");
    assert_eq!(user["id"], id);

    let mut changed = user_body("amina@example.com");
    changed["last_name"] = json!("Osman");
    let (status, updated) = send(&app, "PUT", &format!("/users/{id}"), Some(&token), Some(changed)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "Osman");

    let (status, page) = send(&app, "GET", "/users?page=1&per_page=1", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/users/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/users/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &format!("/users/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_409() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);

    let (status, _) = send(&app, "POST", "/users", Some(&token), Some(user_body("dup@example.com"))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/users", Some(&token), Some(user_body("DUP@example.com"))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, other) = send(&app, "POST", "/users", Some(&token), Some(user_body("other@example.com"))).await?;
    let other_id = other["id"].as_i64().unwrap();
    let (status, _) =
        send(&app, "PUT", &format!("/users/{other_id}"), Some(&token), Some(user_body("dup@example.com"))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_invalid_fields_are_400() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);

    let (status, body) = send(&app, "POST", "/users", Some(&token), Some(user_body("not-an-email"))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let mut bad_phone = user_body("phone@example.com");
    bad_phone["phone_number"] = json!("call me");
    let (status, _) = send(&app, "POST", "/users", Some(&token), Some(bad_phone)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, users) = send(&app, "GET", "/users", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1, "only the seeded admin exists");
    Ok(())
}

#[tokio::test]
async fn test_password_and_permissions_drive_login() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);
    let manager = token_with(&state, &["Permissions.Users.ManagePermissions"]);

    let (_, created) = send(&app, "POST", "/users", Some(&token), Some(user_body("clerk@example.com"))).await?;
    let id = created["id"].as_i64().unwrap();

    let (status, _) =
        send(&app, "PUT", &format!("/users/{id}/password"), Some(&manager), Some(json!({"password": "short"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id}/password"),
        Some(&manager),
        Some(json!({"password": "clerk-passw0rd"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Editing users does not imply managing their permissions
    let grants = json!({"permissions": ["Permissions.Courts.View"]});
    let (status, _) = send(&app, "PUT", &format!("/users/{id}/permissions"), Some(&token), Some(grants.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let bogus = json!({"permissions": ["Permissions.Courts.Demolish"]});
    let (status, _) = send(&app, "PUT", &format!("/users/{id}/permissions"), Some(&manager), Some(bogus)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &format!("/users/{id}/permissions"), Some(&manager), Some(grants)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, session) = login(&app, "clerk@example.com", "clerk-passw0rd").await?;
    assert_eq!(status, StatusCode::OK);
    let clerk = session["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/courts", Some(&clerk), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/users", Some(&clerk), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Changing one's own password needs no grant
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/{id}/password"),
        Some(&clerk),
        Some(json!({"password": "clerk-rotated-1"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = login(&app, "clerk@example.com", "clerk-rotated-1").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_user_editor_cannot_reset_other_passwords() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let editor = token_with(&state, &["Permissions.Users.Edit"]);

    let (status, session) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(status, StatusCode::OK);
    let admin_id = session["user_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{admin_id}/password"),
        Some(&editor),
        Some(json!({"password": "taken-over-1"})),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = login(&app, ADMIN_EMAIL, "taken-over-1").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_malformed_requests_get_json_400() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);

    let mut missing_phone = user_body("nophone@example.com");
    missing_phone.as_object_mut().unwrap().remove("phone_number");
    let (status, body) = send(&app, "POST", "/users", Some(&token), Some(missing_phone)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["detail"].as_str().unwrap().contains("phone_number"), "{body}");

    let (status, body) = send(&app, "GET", "/users?page=abc", Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, body) = send(&app, "GET", "/users/abc", Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");

    let (status, body) = send(&app, "PUT", "/users/abc", Some(&token), Some(user_body("x@example.com"))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    Ok(())
}

#[tokio::test]
async fn test_unknown_user_is_404() -> anyhow::Result<()> {
    let (app, state) = app_with_admin().await?;
    let token = token_with(&state, &ALL_USER_PERMS);
    let (status, body) = send(&app, "GET", "/users/4242", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    let manager = token_with(&state, &["Permissions.Users.ManagePermissions"]);
    let (status, _) =
        send(&app, "PUT", "/users/4242/password", Some(&manager), Some(json!({"password": "long enough"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
