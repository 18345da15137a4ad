use std::sync::LazyLock;

use models::SignupRequest;
use serde::Serialize;

use super::{INVALID_EMAIL, NAME_TOO_SHORT, PASSWORD_TOO_SHORT};
use crate::{
    pipeline::Form,
    remote::UserApi,
    schema::{Field, Schema},
    state::FormValues,
};

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("name").min_length(2, NAME_TOO_SHORT),
        Field::text("email").email(INVALID_EMAIL),
        Field::text("password").min_length(8, PASSWORD_TOO_SHORT),
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignupValues {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl FormValues for SignupValues {
    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "email" => Some(&mut self.email),
            "password" => Some(&mut self.password),
            _ => None,
        }
    }
}

/// Values are sent exactly as typed.
impl From<&SignupValues> for SignupRequest {
    fn from(values: &SignupValues) -> Self {
        Self {
            name: values.name.clone(),
            email: values.email.clone(),
            password: values.password.clone(),
        }
    }
}

pub type SignupForm = Form<SignupValues, UserApi>;

pub fn signup_form(api: UserApi) -> SignupForm {
    Form::new(api)
}
