//! # Models
//!
//! Payloads shared between the backend and the form clients.
//!
//! ## Wire Format
//!
//! Every response body is an [`Envelope`], JSON encoded.
//!
//! - Success: `{ "success": true, "message": "...", "data": { ... } }`
//! - Failure: `{ "success": false, "message": "..." }`
//!
//! ## Endpoints
//!
//! | Route | Body | Responses |
//! |---|---|---|
//! | `POST /api/user/signup` | [`SignupRequest`] | 201, 400 |
//! | `POST /api/user/login` | [`LoginRequest`] | 200, 404, 401 |
pub mod envelope;
pub mod user;

pub use envelope::Envelope;
pub use user::{LoginRequest, SignupRequest, UserRecord};

pub const SIGNUP_PATH: &str = "/api/user/signup";
pub const LOGIN_PATH: &str = "/api/user/login";

/// Client route every form lands on after a successful submit.
pub const HOME_ROUTE: &str = "/";

pub const USER_CREATED: &str = "User created successfully";
pub const USER_EXISTS: &str = "User already exists";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MALFORMED_PAYLOAD: &str = "Malformed payload";
pub const INTERNAL_ERROR: &str = "Internal server error";
