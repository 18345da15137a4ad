//! Compact donation form: province and city are mandatory, the contact number
//! must be numeric when given, and there is no file input.
use std::sync::LazyLock;

use models::{Envelope, HOME_ROUTE};
use serde::Serialize;

use super::{
    AMOUNT_NOT_POSITIVE, AMOUNT_REQUIRED, NAME_REQUIRED,
    donation::{DonationLog, DonationRecord, parse_amount, present},
};
use crate::{
    error::TransportError,
    pipeline::{Form, Remote},
    schema::{Field, Schema, ValidationErrors},
    state::FormValues,
};

pub const PROVINCE_REQUIRED: &str = "Province is required";
pub const CITY_REQUIRED: &str = "City is required";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("name").min_length(2, NAME_REQUIRED),
        Field::number("contactNumber").optional(),
        Field::number("amount")
            .required_message(AMOUNT_REQUIRED)
            .positive(AMOUNT_NOT_POSITIVE),
        Field::text("province").non_empty(PROVINCE_REQUIRED),
        Field::text("city").non_empty(CITY_REQUIRED),
        Field::text("postalCode").optional(),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationFormValues {
    pub name: String,
    pub contact_number: String,
    pub amount: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
}

impl Default for DonationFormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_number: String::new(),
            amount: "0".to_string(),
            province: String::new(),
            city: String::new(),
            postal_code: String::new(),
        }
    }
}

impl FormValues for DonationFormValues {
    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "contactNumber" => Some(&mut self.contact_number),
            "amount" => Some(&mut self.amount),
            "province" => Some(&mut self.province),
            "city" => Some(&mut self.city),
            "postalCode" => Some(&mut self.postal_code),
            _ => None,
        }
    }
}

impl TryFrom<&DonationFormValues> for DonationRecord {
    type Error = ValidationErrors;

    fn try_from(values: &DonationFormValues) -> Result<Self, Self::Error> {
        Ok(Self {
            name: values.name.clone(),
            contact_number: present(&values.contact_number),
            amount: parse_amount(&values.amount)?,
            province: present(&values.province),
            city: present(&values.city),
            postal_code: present(&values.postal_code),
            file: None,
        })
    }
}

impl Remote<DonationFormValues> for DonationLog {
    type Data = DonationRecord;

    fn success_route(&self) -> &'static str {
        HOME_ROUTE
    }

    async fn send(
        &self,
        values: &DonationFormValues,
    ) -> Result<Envelope<DonationRecord>, TransportError> {
        Ok(self.record(DonationRecord::try_from(values)))
    }
}

pub type CompactDonationForm = Form<DonationFormValues, DonationLog>;

pub fn compact_donation_form() -> CompactDonationForm {
    Form::new(DonationLog)
}
