//! # Donation Intake
//!
//! Donations are not sent anywhere yet: a valid submission becomes a
//! [`DonationRecord`], is logged, and the form resets.
use std::sync::LazyLock;

use models::{Envelope, HOME_ROUTE};
use serde::Serialize;
use tracing::{info, warn};

use super::{AMOUNT_NOT_POSITIVE, AMOUNT_REQUIRED, NAME_REQUIRED};
use crate::{
    error::TransportError,
    pipeline::{Form, Remote},
    schema::{EXPECTED_NUMBER, Field, Schema, ValidationErrors},
    state::FormValues,
};

pub const DONATION_RECORDED: &str = "Donation recorded";

/// Select options for `province`.
pub const PROVINCES: [&str; 7] = [
    "Punjab",
    "Sindh",
    "Khyber Pakhtunkhwa",
    "Balochistan",
    "Gilgit-Baltistan",
    "Azad Jammu & Kashmir",
    "Islamabad",
];

/// Select options for `city`.
pub const CITIES: [&str; 7] = [
    "Lahore",
    "Karachi",
    "Islamabad",
    "Gujranwala",
    "Gujrat",
    "Faisalabad",
    "Peshawar",
];

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("name").min_length(2, NAME_REQUIRED),
        Field::text("contactNumber").optional(),
        Field::number("amount")
            .required_message(AMOUNT_REQUIRED)
            .positive(AMOUNT_NOT_POSITIVE),
        Field::text("province").optional(),
        Field::text("city").optional(),
        Field::text("postalCode").optional(),
        Field::text("file").optional(),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationValues {
    pub name: String,
    pub contact_number: String,
    pub amount: String,
    pub province: String,
    pub city: String,
    pub postal_code: String,
    /// Path of the picked file, as reported by the file input.
    pub file: String,
}

impl Default for DonationValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_number: String::new(),
            amount: "0".to_string(),
            province: String::new(),
            city: String::new(),
            postal_code: String::new(),
            file: String::new(),
        }
    }
}

impl FormValues for DonationValues {
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
            "file" => Some(&mut self.file),
            _ => None,
        }
    }
}

/// A validated donation with its amount parsed and blank fields dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub name: String,
    pub contact_number: Option<String>,
    pub amount: f64,
    pub province: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub file: Option<String>,
}

impl TryFrom<&DonationValues> for DonationRecord {
    type Error = ValidationErrors;

    fn try_from(values: &DonationValues) -> Result<Self, Self::Error> {
        Ok(Self {
            name: values.name.clone(),
            contact_number: present(&values.contact_number),
            amount: parse_amount(&values.amount)?,
            province: present(&values.province),
            city: present(&values.city),
            postal_code: present(&values.postal_code),
            file: present(&values.file),
        })
    }
}

pub(crate) fn present(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, ValidationErrors> {
    let amount = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ValidationErrors::single("amount", EXPECTED_NUMBER))?;

    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationErrors::single("amount", AMOUNT_NOT_POSITIVE))
    }
}

/// Stand-in remote for donations: logs the record and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DonationLog;

impl DonationLog {
    /// Through `Form::submit` the schema has already enforced what the
    /// conversion checks, so the `Err` arm only fires for direct callers.
    pub(crate) fn record(
        &self,
        record: Result<DonationRecord, ValidationErrors>,
    ) -> Envelope<DonationRecord> {
        match record {
            Ok(record) => {
                info!(?record, "Donation submitted");
                Envelope::ok(DONATION_RECORDED, record)
            }
            Err(errors) => {
                warn!(%errors, "Donation could not be recorded");
                Envelope::failure(errors.to_string())
            }
        }
    }
}

impl Remote<DonationValues> for DonationLog {
    type Data = DonationRecord;

    fn success_route(&self) -> &'static str {
        HOME_ROUTE
    }

    async fn send(&self, values: &DonationValues) -> Result<Envelope<DonationRecord>, TransportError> {
        Ok(self.record(DonationRecord::try_from(values)))
    }
}

pub type DonationForm = Form<DonationValues, DonationLog>;

pub fn donation_form() -> DonationForm {
    Form::new(DonationLog)
}
