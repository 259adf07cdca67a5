use std::collections::BTreeSet;
use tracing::{info, warn};
use wanderlust_catalog::{Catalog, PriceQuote, PricingEngine, TravelPackage};
use wanderlust_core::{CardDetails, PaymentMethod, ValidationErrors};
use crate::confirmation::ConfirmationCode;
use crate::models::{BookingDraft, BookingStep, TravelerInfo};
use crate::params::{clamp_travelers, BookingParams};

/// Drives one booking through Details → Payment → Confirmation
#[derive(Debug, Clone)]
pub struct BookingFlow {
    package: TravelPackage,
    draft: BookingDraft,
}

impl BookingFlow {
    /// Open a booking for the package named in `params`
    pub fn open(catalog: &Catalog, params: &BookingParams) -> Result<Self, BookingError> {
        let package = catalog
            .find_package(params.package_id)
            .ok_or(BookingError::PackageNotFound(params.package_id))?;
        Ok(Self::new(package.clone(), params))
    }

    /// Seed a draft from navigation parameters. Add-on indices the package
    /// does not have are dropped.
    pub fn new(package: TravelPackage, params: &BookingParams) -> Self {
        let mut selected = BTreeSet::new();
        for &index in &params.add_on_indices {
            if package.is_valid_add_on(index) {
                selected.insert(index);
            } else {
                warn!(
                    "Dropping add-on index {} for package {} ({} add-ons)",
                    index,
                    package.id,
                    package.add_ons.len()
                );
            }
        }

        let draft = BookingDraft::new(package.id, params.traveler_count, params.travel_date, selected);
        Self { package, draft }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn package(&self) -> &TravelPackage {
        &self.package
    }

    pub fn step(&self) -> BookingStep {
        self.draft.step
    }

    /// Flip an add-on in or out of the selection. Returns whether it is now
    /// selected.
    pub fn toggle_add_on(&mut self, index: usize) -> Result<bool, BookingError> {
        self.ensure_editable("change add-ons")?;
        if !self.package.is_valid_add_on(index) {
            return Err(BookingError::InvalidAddOn {
                index,
                available: self.package.add_ons.len(),
            });
        }

        let selected = if self.draft.selected_add_ons.remove(&index) {
            false
        } else {
            self.draft.selected_add_ons.insert(index)
        };
        self.draft.touch();
        Ok(selected)
    }

    /// Values below 1 are raised to 1
    pub fn set_traveler_count(&mut self, n: i64) -> Result<u32, BookingError> {
        self.ensure_editable("change travelers")?;
        self.draft.traveler_count = clamp_travelers(n);
        self.draft.touch();
        Ok(self.draft.traveler_count)
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), BookingError> {
        self.ensure_editable("change payment method")?;
        self.draft.payment_method = method;
        self.draft.touch();
        Ok(())
    }

    pub fn set_installments(&mut self, enabled: bool) -> Result<(), BookingError> {
        self.ensure_editable("change installments")?;
        self.draft.installments_enabled = enabled;
        self.draft.touch();
        Ok(())
    }

    pub fn compute_total(&self) -> u64 {
        PricingEngine::compute_total(&self.package, self.draft.traveler_count, &self.draft.selected_add_ons)
    }

    /// `ceil(total / 3)` when installments are enabled
    pub fn installment_amount(&self) -> Option<u64> {
        self.quote().installments.map(|plan| plan.installment_amount)
    }

    pub fn quote(&self) -> PriceQuote {
        PricingEngine::quote(
            &self.package,
            self.draft.traveler_count,
            &self.draft.selected_add_ons,
            self.draft.installments_enabled,
        )
    }

    /// Details → Payment. On validation failure the step is unchanged.
    pub fn submit_details(&mut self, traveler: TravelerInfo) -> Result<(), BookingError> {
        self.ensure_step(BookingStep::Details, "submit traveler details")?;
        traveler.validate()?;

        self.draft.traveler = traveler;
        self.advance(BookingStep::Payment);
        Ok(())
    }

    /// Payment → Confirmation. Card fields are only checked for card
    /// payments; PayPal and bank transfer hand off to the provider.
    pub fn submit_payment(&mut self, payment_details: &CardDetails) -> Result<&ConfirmationCode, BookingError> {
        self.ensure_step(BookingStep::Payment, "submit payment")?;
        if self.draft.payment_method.requires_card_details() {
            payment_details.validate()?;
            self.draft.card_reference = Some(payment_details.masked_number());
        } else if let Some(target) = self.draft.payment_method.redirect_target() {
            info!("Booking for package {} redirected to {}", self.package.id, target);
        }

        let code = ConfirmationCode::generate();
        info!(
            "Booking confirmed: {} for {} (package {}, total {})",
            code,
            self.draft.traveler.full_name(),
            self.package.id,
            self.compute_total()
        );
        self.advance(BookingStep::Confirmation);

        Ok(&*self.draft.confirmation_code.insert(code))
    }

    /// Payment → Details. Returns `false` and leaves the step alone from any
    /// other step.
    pub fn go_back(&mut self) -> bool {
        if self.draft.step != BookingStep::Payment {
            return false;
        }
        self.advance(BookingStep::Details);
        true
    }

    /// Discard this draft and start over on the same package with default
    /// parameters.
    pub fn restart(self) -> Self {
        let params = BookingParams {
            package_id: self.package.id,
            ..BookingParams::default()
        };
        Self::new(self.package, &params)
    }

    fn advance(&mut self, to: BookingStep) {
        info!("Booking step {} -> {}", self.draft.step, to);
        self.draft.step = to;
        self.draft.touch();
    }

    fn ensure_step(&self, expected: BookingStep, action: &'static str) -> Result<(), BookingError> {
        if self.draft.step != expected {
            return Err(BookingError::InvalidTransition {
                from: self.draft.step,
                action,
            });
        }
        Ok(())
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), BookingError> {
        if self.draft.step == BookingStep::Confirmation {
            return Err(BookingError::InvalidTransition {
                from: self.draft.step,
                action,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Package not found: {0}")]
    PackageNotFound(u32),

    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Add-on index {index} is out of range ({available} add-ons available)")]
    InvalidAddOn {
        index: usize,
        available: usize,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Cannot {action} at step {from}")]
    InvalidTransition {
        from: BookingStep,
        action: &'static str,
    },
}
