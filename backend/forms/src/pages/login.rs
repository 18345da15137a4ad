use std::sync::LazyLock;

use models::LoginRequest;
use serde::Serialize;

use super::{INVALID_EMAIL, PASSWORD_TOO_SHORT};
use crate::{
    pipeline::Form,
    remote::UserApi,
    schema::{Field, Schema},
    state::FormValues,
};

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("email").email(INVALID_EMAIL),
        Field::text("password").min_length(8, PASSWORD_TOO_SHORT),
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginValues {
    pub email: String,
    pub password: String,
}

impl FormValues for LoginValues {
    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "email" => Some(&mut self.email),
            "password" => Some(&mut self.password),
            _ => None,
        }
    }
}

impl From<&LoginValues> for LoginRequest {
    fn from(values: &LoginValues) -> Self {
        Self {
            email: values.email.clone(),
            password: values.password.clone(),
        }
    }
}

pub type LoginForm = Form<LoginValues, UserApi>;

pub fn login_form(api: UserApi) -> LoginForm {
    Form::new(api)
}
