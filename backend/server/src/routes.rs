use std::sync::Arc;

use axum::{
    Json,
    extract::{self, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use models::{Envelope, LOGIN_SUCCESSFUL, LoginRequest, SignupRequest, USER_CREATED, UserRecord};
use tracing::{info, warn};

use crate::{error::AppError, state::State};

pub async fn signup_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected signup payload: {rejection}");
        AppError::MalformedPayload
    })?;

    if state.store.find_user(&request.email).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let record = UserRecord::from(request);
    if !state.store.insert_user(&record).await? {
        warn!(email = %record.email, "Concurrent signup already took this email");
        return Err(AppError::UserExists);
    }

    info!(email = %record.email, "User created");
    Ok((StatusCode::CREATED, Json(Envelope::ok(USER_CREATED, record))))
}

pub async fn login_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected login payload: {rejection}");
        AppError::MalformedPayload
    })?;

    let user = state
        .store
        .find_user(&request.email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    // Plaintext comparison, matching what existing accounts were created with.
    if user.password != request.password {
        return Err(AppError::InvalidCredentials);
    }

    info!(email = %user.email, "User logged in");
    Ok((StatusCode::OK, Json(Envelope::ok(LOGIN_SUCCESSFUL, user))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use models::{Envelope, LOGIN_PATH, SIGNUP_PATH, UserRecord};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{app, config::Config, database::Store, state::State};

    fn test_state() -> Arc<State> {
        let config = Config::from_lookup(|_| None, |_| None).unwrap();

        State::with_store(config, Store::memory())
    }

    async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Envelope<Value>) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn alice() -> Value {
        json!({ "name": "Alice", "email": "a@x.com", "password": "password1" })
    }

    #[tokio::test]
    async fn test_signup_creates_user() {
        let state = test_state();
        let app = app(state.clone()).unwrap();

        let (status, body) = post(&app, SIGNUP_PATH, alice()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data, Some(alice()));

        let stored = state.store.find_user("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let state = test_state();
        let app = app(state.clone()).unwrap();

        post(&app, SIGNUP_PATH, alice()).await;
        let (status, body) = post(
            &app,
            SIGNUP_PATH,
            json!({ "name": "Other", "email": "a@x.com", "password": "different1" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.message, "User already exists");
        assert_eq!(body.data, None);
        assert_eq!(state.store.count_users().await.unwrap(), 1);

        let stored: UserRecord = state.store.find_user("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
    }

    #[tokio::test]
    async fn test_login_paths() {
        let app = app(test_state()).unwrap();
        post(&app, SIGNUP_PATH, alice()).await;

        let (status, body) = post(
            &app,
            LOGIN_PATH,
            json!({ "email": "a@x.com", "password": "password1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, "Login successful");
        assert_eq!(body.data, Some(alice()));

        let (status, body) = post(
            &app,
            LOGIN_PATH,
            json!({ "email": "a@x.com", "password": "wrong" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, "Invalid credentials");

        let (status, body) = post(
            &app,
            LOGIN_PATH,
            json!({ "email": "nobody@x.com", "password": "x" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "User not found");
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let app = app(test_state()).unwrap();

        let (status, body) = post(&app, SIGNUP_PATH, json!({ "email": "a@x.com" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Malformed payload");
    }
}
