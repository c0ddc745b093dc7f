// Pricing core
//
// Pure, storage-independent logic: base price resolution, promotion selection
// and offer validation. Callers pass in catalog snapshots; nothing here touches
// the database.

pub mod error;
pub mod models;
pub mod promotion;
pub mod resolver;
pub mod types;
pub mod validation;

pub use error::{PricingError, PricingResult};
pub use models::{FrameOption, NewOffer, NewPricingRule, Offer, PricingRule};
pub use promotion::{PromotionOutcome, PromotionRequest, PromotionSelector};
pub use resolver::PriceResolver;
pub use types::{Money, OfferType, RejectionReason};
pub use validation::OfferValidator;
