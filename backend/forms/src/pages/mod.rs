//! The concrete forms. Each one declares its raw values, its schema, and what
//! a successful submit is handed to.
pub mod donation;
pub mod donation_form;
pub mod login;
pub mod signup;

pub const NAME_TOO_SHORT: &str = "Name should be at least 2 characters";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password should be at least 8 characters";
pub const NAME_REQUIRED: &str = "Name is required";
pub const AMOUNT_REQUIRED: &str = "Amount is required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be positive";
