//! # Forms
//!
//! Client side of the donation platform: the validation and submission
//! pipeline shared by every form.
//!
//! ## Flow
//!
//! - Input lands in a [`FormState`] through `set_field`
//! - Blur marks a field touched and refreshes its error
//! - Submit revalidates against the form's [`Schema`]; only clean values reach the [`Remote`]
//! - A success envelope resets the form and yields the route to navigate to
//! - A failure envelope or transport error becomes the server banner, input is kept
//!
//! ## Forms
//!
//! | Form | Remote |
//! |---|---|
//! | [`pages::login`] | `POST /api/user/login` |
//! | [`pages::signup`] | `POST /api/user/signup` |
//! | [`pages::donation`] | logged locally |
//! | [`pages::donation_form`] | logged locally |
//!
//! ## Threading
//!
//! A form lives on one logical thread. The only suspension point is the remote
//! call, and nothing here requires `Send`.
pub mod error;
pub mod pages;
pub mod pipeline;
pub mod remote;
pub mod schema;
pub mod state;

pub use error::{FormError, TransportError};
pub use pipeline::{Begin, Form, Outcome, Remote, Ticket};
pub use remote::UserApi;
pub use schema::{Field, Record, Schema, ValidationErrors};
pub use state::{FormState, FormValues};
