// HTTP handlers for order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::AdminUser;
use crate::orders::{
    service::PlacedOrder, CreateOrderRequest, Order, OrderError, OrderFilter, Quote, QuoteRequest,
    UpdateNotesRequest, UpdatePaymentRequest, UpdateStatusRequest,
};
use crate::AppState;

/// Handler for POST /api/orders/quote
/// Prices a selection and checks a coupon without placing an order
pub async fn quote_handler(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Quote>, OrderError> {
    request.validate()?;

    let quote = state
        .orders
        .quote(&request.selection(), request.phone.as_deref())
        .await?;

    Ok(Json(quote))
}

/// Handler for POST /api/orders
/// Places a new order
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<PlacedOrder>), OrderError> {
    request.validate()?;

    let placed = state.orders.place_order(request).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// Handler for GET /api/admin/orders
/// Lists orders, newest first, optionally filtered by status (Admin only)
pub async fn list_orders_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, OrderError> {
    let orders = state.orders.list_orders(&filter).await?;
    Ok(Json(orders))
}

/// Handler for GET /api/admin/orders/:id (Admin only)
pub async fn get_order_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Order>, OrderError> {
    let order = state.orders.get_order(id).await?;
    Ok(Json(order))
}

/// Handler for PATCH /api/admin/orders/:id/status (Admin only)
pub async fn update_order_status_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, OrderError> {
    tracing::debug!("{} requested status {} for order {}", admin.subject, request.status, id);
    let order = state.orders.update_status(id, &request.status).await?;
    Ok(Json(order))
}

/// Handler for PATCH /api/admin/orders/:id/payment (Admin only)
pub async fn update_payment_status_handler(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Order>, OrderError> {
    tracing::debug!(
        "{} requested payment status {} for order {}",
        admin.subject,
        request.payment_status,
        id
    );
    let order = state
        .orders
        .update_payment_status(id, &request.payment_status)
        .await?;
    Ok(Json(order))
}

/// Handler for PATCH /api/admin/orders/:id/notes (Admin only)
pub async fn update_notes_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<Order>, OrderError> {
    request.validate()?;

    let order = state
        .orders
        .update_admin_notes(id, request.admin_notes)
        .await?;
    Ok(Json(order))
}
