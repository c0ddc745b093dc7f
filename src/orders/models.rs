use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::pricing::{Money, PromotionOutcome};

/// Fulfillment stage of a commissioned portrait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    PreviewSent,
    Revision,
    Approved,
    Completed,
}

impl FulfillmentStatus {
    pub const ALL: [FulfillmentStatus; 5] = [
        FulfillmentStatus::Pending,
        FulfillmentStatus::PreviewSent,
        FulfillmentStatus::Revision,
        FulfillmentStatus::Approved,
        FulfillmentStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Pending => "PENDING",
            FulfillmentStatus::PreviewSent => "PREVIEW_SENT",
            FulfillmentStatus::Revision => "REVISION",
            FulfillmentStatus::Approved => "APPROVED",
            FulfillmentStatus::Completed => "COMPLETED",
        }
    }
}

impl Default for FulfillmentStatus {
    fn default() -> Self {
        FulfillmentStatus::Pending
    }
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exact, case-sensitive parse
impl std::str::FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid fulfillment status: {}", s))
    }
}

/// Payment state of an order, independent of fulfillment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exact, case-sensitive parse
impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid payment status: {}", s))
    }
}

/// Which of the two status fields a transition targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    Fulfillment,
    Payment,
}

impl std::fmt::Display for StatusField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusField::Fulfillment => write!(f, "status"),
            StatusField::Payment => write!(f, "payment_status"),
        }
    }
}

/// A placed portrait order
///
/// Prices are snapshots taken at placement; later catalog edits never change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub style: String,
    pub size: String,
    pub number_of_faces: i32,
    pub frame_id: Option<i64>,
    pub reference_images: Vec<String>,
    pub customer_notes: Option<String>,
    pub base_price: Money,
    pub frame_price: Money,
    pub discount_amount: Money,
    pub final_price: Money,
    pub coupon_code: Option<String>,
    pub applied_offer_id: Option<i64>,
    pub status: FulfillmentStatus,
    pub payment_status: PaymentStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the customer picked: enough to price an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSelection {
    pub style: String,
    pub size: String,
    pub number_of_faces: i32,
    pub frame_id: Option<i64>,
    pub coupon_code: Option<String>,
}

/// Request DTO for POST /api/orders/quote
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub style: String,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub size: String,
    #[validate(range(min = 1, message = "number_of_faces must be at least 1"))]
    pub number_of_faces: i32,
    pub frame_id: Option<i64>,
    pub coupon_code: Option<String>,
    /// Lets the quote check first-order offers; without it the customer is treated as new
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone: Option<String>,
}

impl QuoteRequest {
    /// The priced part of the request, with style and size trimmed
    pub fn selection(&self) -> OrderSelection {
        OrderSelection {
            style: self.style.trim().to_string(),
            size: self.size.trim().to_string(),
            number_of_faces: self.number_of_faces,
            frame_id: self.frame_id,
            coupon_code: self.coupon_code.clone(),
        }
    }
}

/// Request DTO for POST /api/orders
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(custom = "crate::validation::validate_not_blank", length(max = 100))]
    pub customer_name: String,
    #[validate(custom = "crate::validation::validate_phone")]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    /// Delivery address for the finished piece
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub style: String,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub size: String,
    #[validate(range(min = 1, message = "number_of_faces must be at least 1"))]
    pub number_of_faces: i32,
    pub frame_id: Option<i64>,
    pub coupon_code: Option<String>,
    #[serde(default)]
    #[validate(custom = "crate::validation::validate_image_urls")]
    pub reference_images: Vec<String>,
    #[validate(length(max = 2000))]
    pub customer_notes: Option<String>,
}

impl CreateOrderRequest {
    pub fn selection(&self) -> OrderSelection {
        OrderSelection {
            style: self.style.trim().to_string(),
            size: self.size.trim().to_string(),
            number_of_faces: self.number_of_faces,
            frame_id: self.frame_id,
            coupon_code: self.coupon_code.clone(),
        }
    }
}

/// Request DTO for PATCH /api/admin/orders/:id/status
///
/// Kept as a raw string so unknown values reach the status guard and come
/// back as `InvalidTransition` rather than a body-parsing error.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request DTO for PATCH /api/admin/orders/:id/payment
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub payment_status: String,
}

/// Request DTO for PATCH /api/admin/orders/:id/notes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotesRequest {
    #[validate(length(max = 5000))]
    pub admin_notes: Option<String>,
}

/// Query parameters for GET /api/admin/orders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<FulfillmentStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s)
            && self
                .payment_status
                .map_or(true, |p| order.payment_status == p)
    }
}

/// Itemised price of an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: Money,
    pub frame_price: Money,
    pub discount_amount: Money,
    pub final_price: Money,
}

/// Response for POST /api/orders/quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
    pub is_first_order: bool,
    pub promotion: PromotionOutcome,
}

/// Everything needed to persist a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub selection: OrderSelection,
    pub reference_images: Vec<String>,
    pub customer_notes: Option<String>,
    pub breakdown: PriceBreakdown,
    pub applied_offer_id: Option<i64>,
}

impl NewOrder {
    /// Materialise as a stored order in its entry states
    pub fn into_order(self, id: i64, now: DateTime<Utc>) -> Order {
        Order {
            id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            style: self.selection.style,
            size: self.selection.size,
            number_of_faces: self.selection.number_of_faces,
            frame_id: self.selection.frame_id,
            reference_images: self.reference_images,
            customer_notes: self.customer_notes,
            base_price: self.breakdown.base_price,
            frame_price: self.breakdown.frame_price,
            discount_amount: self.breakdown.discount_amount,
            final_price: self.breakdown.final_price,
            coupon_code: self.selection.coupon_code,
            applied_offer_id: self.applied_offer_id,
            status: FulfillmentStatus::default(),
            payment_status: PaymentStatus::default(),
            admin_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fulfillment_status_parse_is_exact() {
        assert_eq!(
            FulfillmentStatus::from_str("PREVIEW_SENT").unwrap(),
            FulfillmentStatus::PreviewSent
        );
        assert!(FulfillmentStatus::from_str("preview_sent").is_err());
        assert!(FulfillmentStatus::from_str("SHIPPED").is_err());
        assert!(FulfillmentStatus::from_str("").is_err());
    }

    #[test]
    fn test_payment_status_parse_is_exact() {
        assert_eq!(PaymentStatus::from_str("PAID").unwrap(), PaymentStatus::Paid);
        assert!(PaymentStatus::from_str("Paid").is_err());
        assert!(PaymentStatus::from_str("UNPAID").is_err());
    }

    #[test]
    fn test_entry_states() {
        assert_eq!(FulfillmentStatus::default(), FulfillmentStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for status in FulfillmentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in PaymentStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_create_order_request_validation() {
        let request: CreateOrderRequest = serde_json::from_str(
            r#"{
                "customer_name": "Asha",
                "phone": "+91 98765-43210",
                "style": "Pencil Sketch",
                "size": "A4",
                "number_of_faces": 2
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.reference_images.is_empty());

        let mut bad = request.clone();
        bad.phone = "n/a".to_string();
        assert!(bad.validate().is_err());

        let mut bad = request.clone();
        bad.number_of_faces = 0;
        assert!(bad.validate().is_err());

        let mut bad = request;
        bad.email = Some("not-an-email".to_string());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_filter() {
        let filter = OrderFilter {
            status: Some(FulfillmentStatus::Completed),
            payment_status: None,
        };
        let now = Utc::now();
        let mut order = NewOrder {
            order_number: "PT-20240101-ABC123".to_string(),
            customer_name: "Asha".to_string(),
            phone: "+919876543210".to_string(),
            email: None,
            address: None,
            selection: OrderSelection {
                style: "Sketch".to_string(),
                size: "A4".to_string(),
                number_of_faces: 1,
                frame_id: None,
                coupon_code: None,
            },
            reference_images: vec![],
            customer_notes: None,
            breakdown: PriceBreakdown {
                base_price: Money::from(1500),
                frame_price: Money::ZERO,
                discount_amount: Money::ZERO,
                final_price: Money::from(1500),
            },
            applied_offer_id: None,
        }
        .into_order(1, now);

        assert!(!filter.matches(&order));
        order.status = FulfillmentStatus::Completed;
        assert!(filter.matches(&order));
        assert!(OrderFilter::default().matches(&order));
    }
}
