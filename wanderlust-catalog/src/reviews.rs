use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;
use uuid::Uuid;
use wanderlust_core::{FieldError, ValidationErrors};

pub const REVIEW_ACKNOWLEDGEMENT: &str = "Review submitted successfully! Thank you for your feedback.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub package_id: u32,
    pub customer_name: String,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub helpful: u32,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    #[default]
    Newest,
    RatingHigh,
    RatingLow,
    Helpful,
}

impl FromStr for ReviewSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "rating-high" => Ok(Self::RatingHigh),
            "rating-low" => Ok(Self::RatingLow),
            "helpful" => Ok(Self::Helpful),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub rating: Option<u8>,
    pub package_id: Option<u32>,
    pub sort: ReviewSort,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.rating.map_or(true, |r| review.rating == r)
            && self.package_id.map_or(true, |id| review.package_id == id)
    }

    pub fn apply<'a>(&self, reviews: &'a [Review]) -> Vec<&'a Review> {
        let mut matched: Vec<&Review> = reviews.iter().filter(|r| self.matches(r)).collect();
        match self.sort {
            ReviewSort::Newest => matched.sort_by(|a, b| b.date.cmp(&a.date)),
            ReviewSort::RatingHigh => matched.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ReviewSort::RatingLow => matched.sort_by(|a, b| a.rating.cmp(&b.rating)),
            ReviewSort::Helpful => matched.sort_by(|a, b| b.helpful.cmp(&a.helpful)),
        }
        matched
    }
}

/// Mean star rating, 0.0 for an empty catalog
pub fn average_rating(reviews: &[Review]) -> f32 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    sum as f32 / reviews.len() as f32
}

/// A review typed into the "write a review" form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    #[serde(default)]
    pub customer_name: String,
    pub package_id: Option<u32>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

impl ReviewSubmission {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("customer_name", &self.customer_name);
        if self.package_id.is_none() {
            errors.push(FieldError::required("package_id"));
        }
        if !(1..=5).contains(&self.rating) {
            errors.push(FieldError::new("rating", "rating must be between 1 and 5"));
        }
        errors.require("title", &self.title);
        errors.require("comment", &self.comment);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReceipt {
    pub id: Uuid,
    pub package_id: u32,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: u32, package_id: u32, rating: u8, date: &str, helpful: u32) -> Review {
        Review {
            id,
            package_id,
            customer_name: format!("Customer {}", id),
            rating,
            title: "Great".into(),
            comment: "Loved it".into(),
            date: date.parse().unwrap(),
            helpful,
            verified: true,
        }
    }

    fn reviews() -> Vec<Review> {
        vec![
            review(1, 1, 5, "2024-03-01", 4),
            review(2, 2, 3, "2024-05-10", 12),
            review(3, 1, 4, "2024-01-20", 7),
        ]
    }

    #[test]
    fn test_filter_and_sort() {
        let reviews = reviews();

        let newest: Vec<u32> = ReviewFilter::default().apply(&reviews).iter().map(|r| r.id).collect();
        assert_eq!(newest, vec![2, 1, 3]);

        let filter = ReviewFilter { package_id: Some(1), sort: ReviewSort::RatingLow, ..Default::default() };
        let ids: Vec<u32> = filter.apply(&reviews).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let filter = ReviewFilter { rating: Some(3), ..Default::default() };
        assert_eq!(filter.apply(&reviews).len(), 1);

        let filter = ReviewFilter { sort: ReviewSort::Helpful, ..Default::default() };
        assert_eq!(filter.apply(&reviews)[0].id, 2);
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&reviews()), 4.0);
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_submission_validation() {
        let submission = ReviewSubmission {
            customer_name: "Ada".into(),
            package_id: Some(1),
            rating: 5,
            title: "Wonderful".into(),
            comment: "Would go again".into(),
        };
        assert!(submission.validate().is_ok());

        let errors = ReviewSubmission { rating: 0, package_id: None, ..submission }.validate().unwrap_err();
        assert!(errors.contains("rating"));
        assert!(errors.contains("package_id"));
    }
}
