use serde::{Deserialize, Serialize};
use crate::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Credit,
    Paypal,
    Bank,
}

impl PaymentMethod {
    /// Only card payments are captured on our side; the others hand off to
    /// an external provider.
    pub fn requires_card_details(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }

    /// Name of the provider the customer is redirected to, if any.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::Credit => None,
            PaymentMethod::Paypal => Some("PayPal"),
            PaymentMethod::Bank => Some("your bank"),
        }
    }
}

/// Card form as typed by the customer. Nothing here is ever charged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
    #[serde(default)]
    pub name_on_card: String,
    #[serde(default)]
    pub billing_address: String,
}

impl CardDetails {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("card_number", &self.card_number);
        errors.require("expiry_date", &self.expiry_date);
        errors.require("cvv", &self.cvv);
        errors.require("name_on_card", &self.name_on_card);
        errors.require("billing_address", &self.billing_address);
        errors.into_result()
    }

    /// Last four digits for display, e.g. `**** 3456`.
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** {}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_card() -> CardDetails {
        CardDetails {
            card_number: "1234 5678 9012 3456".to_string(),
            expiry_date: "12/29".to_string(),
            cvv: "123".to_string(),
            name_on_card: "Ada Lovelace".to_string(),
            billing_address: "1 Analytical Way".to_string(),
        }
    }

    #[test]
    fn test_card_validation() {
        assert!(complete_card().validate().is_ok());

        let card = CardDetails { cvv: String::new(), billing_address: " ".to_string(), ..complete_card() };
        let errors = card.validate().unwrap_err();
        assert!(errors.contains("cvv"));
        assert!(errors.contains("billing_address"));
        assert!(!errors.contains("card_number"));
    }

    #[test]
    fn test_masked_number() {
        assert_eq!(complete_card().masked_number(), "**** 3456");
        assert_eq!(CardDetails::default().masked_number(), "**** ");
    }

    #[test]
    fn test_redirect_targets() {
        assert!(PaymentMethod::Credit.requires_card_details());
        assert_eq!(PaymentMethod::Paypal.redirect_target(), Some("PayPal"));
        assert_eq!(PaymentMethod::Bank.redirect_target(), Some("your bank"));
    }
}
