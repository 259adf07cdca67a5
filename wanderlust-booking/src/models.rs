use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fmt;
use wanderlust_core::{PaymentMethod, ValidationErrors};
use crate::confirmation::ConfirmationCode;

/// Booking step in the checkout flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStep {
    Details,
    Payment,
    Confirmation,
}

impl BookingStep {
    /// 1-based position shown in the progress header
    pub fn number(&self) -> u8 {
        match self {
            BookingStep::Details => 1,
            BookingStep::Payment => 2,
            BookingStep::Confirmation => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStep::Details => "Traveler Details",
            BookingStep::Payment => "Payment",
            BookingStep::Confirmation => "Confirmation",
        }
    }
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStep::Details => "DETAILS",
            BookingStep::Payment => "PAYMENT",
            BookingStep::Confirmation => "CONFIRMATION",
        };
        f.write_str(name)
    }
}

/// Lead traveler contact details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TravelerInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub special_requests: String,
}

impl TravelerInfo {
    /// Every field except special requests is required.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);
        errors.require("email", &self.email);
        errors.require("phone", &self.phone);
        errors.into_result()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An in-progress booking. Mutated only through [`crate::BookingFlow`];
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDraft {
    pub(crate) package_id: u32,
    pub(crate) traveler_count: u32,
    pub(crate) travel_date: Option<NaiveDate>,
    pub(crate) selected_add_ons: BTreeSet<usize>,
    pub(crate) step: BookingStep,
    pub(crate) traveler: TravelerInfo,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) installments_enabled: bool,
    pub(crate) confirmation_code: Option<ConfirmationCode>,
    /// Masked card number once a card payment went through
    pub(crate) card_reference: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl BookingDraft {
    pub(crate) fn new(
        package_id: u32,
        traveler_count: u32,
        travel_date: Option<NaiveDate>,
        selected_add_ons: BTreeSet<usize>,
    ) -> Self {
        let now = Utc::now();
        Self {
            package_id,
            traveler_count: traveler_count.max(1),
            travel_date,
            selected_add_ons,
            step: BookingStep::Details,
            traveler: TravelerInfo::default(),
            payment_method: PaymentMethod::default(),
            installments_enabled: false,
            confirmation_code: None,
            card_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn package_id(&self) -> u32 {
        self.package_id
    }

    pub fn traveler_count(&self) -> u32 {
        self.traveler_count
    }

    pub fn travel_date(&self) -> Option<NaiveDate> {
        self.travel_date
    }

    pub fn selected_add_ons(&self) -> &BTreeSet<usize> {
        &self.selected_add_ons
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn traveler(&self) -> &TravelerInfo {
        &self.traveler
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn installments_enabled(&self) -> bool {
        self.installments_enabled
    }

    pub fn confirmation_code(&self) -> Option<&ConfirmationCode> {
        self.confirmation_code.as_ref()
    }

    pub fn card_reference(&self) -> Option<&str> {
        self.card_reference.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last time the draft was edited or moved between steps
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
