pub mod models;
pub mod params;
pub mod flow;
pub mod manager;
pub mod confirmation;

pub use models::{BookingDraft, BookingStep, TravelerInfo};
pub use params::{BookingParams, RawBookingParams};
pub use flow::{BookingError, BookingFlow};
pub use manager::BookingManager;
pub use confirmation::ConfirmationCode;
