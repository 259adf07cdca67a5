use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::package::TravelPackage;

/// Number of charges in an installment plan
pub const INSTALLMENT_COUNT: u64 = 3;

/// Days between consecutive installment charges
pub const INSTALLMENT_INTERVAL_DAYS: u32 = 30;

/// One priced line of a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteLine {
    pub label: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub due_in_days: u32,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallmentPlan {
    /// Advertised per-charge amount, `ceil(total / 3)`
    pub installment_amount: u64,
    /// Charges at day 0, 30 and 60. The last one absorbs the rounding so the
    /// schedule sums to the quoted total.
    pub schedule: Vec<Installment>,
}

impl InstallmentPlan {
    pub fn for_total(total: u64) -> Self {
        let installment_amount = total.div_ceil(INSTALLMENT_COUNT);
        let mut remaining = total;
        let schedule = (0..INSTALLMENT_COUNT as u32)
            .map(|n| {
                let amount = installment_amount.min(remaining);
                remaining -= amount;
                Installment {
                    due_in_days: n * INSTALLMENT_INTERVAL_DAYS,
                    amount,
                }
            })
            .collect();

        Self { installment_amount, schedule }
    }

    /// What the customer pays today
    pub fn due_today(&self) -> u64 {
        self.schedule.first().map(|i| i.amount).unwrap_or(0)
    }
}

/// Price breakdown for a package selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub package_id: u32,
    pub traveler_count: u32,
    pub base: QuoteLine,
    pub add_ons: Vec<QuoteLine>,
    pub total: u64,
    pub installments: Option<InstallmentPlan>,
}

impl PriceQuote {
    /// Amount charged at checkout
    pub fn due_today(&self) -> u64 {
        self.installments
            .as_ref()
            .map(InstallmentPlan::due_today)
            .unwrap_or(self.total)
    }
}

/// Prices a package for a traveler count and add-on selection
pub struct PricingEngine;

impl PricingEngine {
    /// `price * travelers + sum(selected add-on prices)`. Indices without a
    /// matching add-on contribute nothing.
    pub fn compute_total(package: &TravelPackage, traveler_count: u32, add_ons: &BTreeSet<usize>) -> u64 {
        let base = package.price.saturating_mul(traveler_count as u64);
        add_ons
            .iter()
            .filter_map(|&index| package.add_on(index))
            .fold(base, |sum, add_on| sum.saturating_add(add_on.price))
    }

    pub fn quote(
        package: &TravelPackage,
        traveler_count: u32,
        add_ons: &BTreeSet<usize>,
        installments: bool,
    ) -> PriceQuote {
        let total = Self::compute_total(package, traveler_count, add_ons);

        PriceQuote {
            package_id: package.id,
            traveler_count,
            base: QuoteLine {
                label: format!("Package (x{})", traveler_count),
                amount: package.price.saturating_mul(traveler_count as u64),
            },
            add_ons: add_ons
                .iter()
                .filter_map(|&index| package.add_on(index))
                .map(|add_on| QuoteLine {
                    label: add_on.name.clone(),
                    amount: add_on.price,
                })
                .collect(),
            total,
            installments: installments.then(|| InstallmentPlan::for_total(total)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{AddOn, PackageCategory};

    fn package() -> TravelPackage {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Bali Retreat",
            "location": "Bali, Indonesia",
            "category": "luxury",
            "price": 1000,
        }))
        .map(|mut pkg: TravelPackage| {
            pkg.add_ons = vec![
                AddOn { name: "Spa Day".into(), description: String::new(), price: 150 },
                AddOn { name: "Sunset Cruise".into(), description: String::new(), price: 90 },
            ];
            pkg
        })
        .unwrap()
    }

    #[test]
    fn test_compute_total() {
        let pkg = package();
        assert_eq!(pkg.category, PackageCategory::Luxury);

        assert_eq!(PricingEngine::compute_total(&pkg, 2, &BTreeSet::new()), 2000);
        assert_eq!(PricingEngine::compute_total(&pkg, 2, &BTreeSet::from([0])), 2150);
        assert_eq!(PricingEngine::compute_total(&pkg, 3, &BTreeSet::from([0, 1])), 3240);
        // Unknown add-on contributes nothing
        assert_eq!(PricingEngine::compute_total(&pkg, 1, &BTreeSet::from([9])), 1000);
    }

    #[test]
    fn test_installment_plan_reconciles_total() {
        let plan = InstallmentPlan::for_total(2150);
        assert_eq!(plan.installment_amount, 717);
        let amounts: Vec<u64> = plan.schedule.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![717, 717, 716]);
        let days: Vec<u32> = plan.schedule.iter().map(|i| i.due_in_days).collect();
        assert_eq!(days, vec![0, 30, 60]);
        assert_eq!(amounts.iter().sum::<u64>(), 2150);

        let tiny = InstallmentPlan::for_total(1);
        assert_eq!(tiny.installment_amount, 1);
        assert_eq!(tiny.schedule.iter().map(|i| i.amount).sum::<u64>(), 1);

        let even = InstallmentPlan::for_total(3000);
        assert!(even.schedule.iter().all(|i| i.amount == 1000));
    }

    #[test]
    fn test_quote_breakdown() {
        let pkg = package();
        let quote = PricingEngine::quote(&pkg, 2, &BTreeSet::from([0]), true);

        assert_eq!(quote.base.amount, 2000);
        assert_eq!(quote.add_ons, vec![QuoteLine { label: "Spa Day".into(), amount: 150 }]);
        assert_eq!(quote.total, 2150);
        assert_eq!(quote.due_today(), 717);

        let full = PricingEngine::quote(&pkg, 2, &BTreeSet::from([0]), false);
        assert!(full.installments.is_none());
        assert_eq!(full.due_today(), 2150);
    }
}
