//! Purchase and order read endpoints.
//!
//! ```text
//! POST /api/v1/purchase {"userId":"ada@example.com","eventId":"jazz-night","ticketTypeId":"standard","quantity":2}
//! GET /api/v1/orders/{orderId}
//! ```
//!
//! The handlers only shape payloads; ticket selection, inventory checks and
//! the commit live behind [`crate::domain::ports::PurchaseCommand`].

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, Order, OrderId, PurchaseRequest, TicketHints};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, OrderSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, hint_text, parse_event_id, parse_order_id, parse_quantity, parse_user_id,
    require_text,
};

const PURCHASE_SUCCEEDED: &str = "Purchase successful.";

/// Purchase request body for `POST /api/v1/purchase`.
///
/// Hints may be numbers or strings. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestBody {
    #[schema(example = "ada@example.com")]
    pub user_id: Option<String>,
    #[schema(example = "jazz-night-2026")]
    pub event_id: Option<String>,
    #[schema(value_type = Option<String>, example = "standard")]
    pub ticket_type_id: Option<Value>,
    /// Exact price of the wanted ticket type. Also accepted as `priceHint`.
    #[serde(alias = "priceHint")]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub price: Option<Value>,
    /// Zero-based position of the wanted ticket type.
    #[schema(value_type = Option<u32>, example = 0)]
    pub idx: Option<Value>,
    /// Defaults to one.
    #[schema(value_type = Option<u32>, example = 2)]
    pub quantity: Option<Value>,
}

impl TryFrom<PurchaseRequestBody> for PurchaseRequest {
    type Error = Error;

    fn try_from(body: PurchaseRequestBody) -> Result<Self, Self::Error> {
        let user_id = parse_user_id(body.user_id, FieldName::new("userId"))?;
        let event_field = FieldName::new("eventId");
        let event_id = parse_event_id(&require_text(body.event_id, event_field)?, event_field)?;
        let quantity = parse_quantity(body.quantity.as_ref(), FieldName::new("quantity"))?;
        Ok(Self {
            user_id,
            event_id,
            hints: TicketHints {
                ticket_type_id: hint_text(body.ticket_type_id.as_ref()),
                price: hint_text(body.price.as_ref()),
                index: hint_text(body.idx.as_ref()),
            },
            quantity,
        })
    }
}

/// Successful purchase payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = "Purchase successful.")]
    pub message: String,
    #[schema(value_type = String, format = Uuid)]
    pub order_id: OrderId,
    #[schema(value_type = OrderSchema)]
    pub order: Order,
}

/// Order lookup payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(value_type = OrderSchema)]
    pub order: Order,
}

/// Buy tickets for one event.
#[utoipa::path(
    post,
    path = "/api/v1/purchase",
    request_body = PurchaseRequestBody,
    responses(
        (status = 200, description = "Order committed", body = PurchaseResponse),
        (status = 400, description = "Invalid request or not enough tickets", body = ErrorSchema),
        (status = 404, description = "Unknown user, event or ticket type", body = ErrorSchema),
        (status = 409, description = "Lost a race with a concurrent purchase; retry", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "purchase"
)]
#[post("/purchase")]
pub async fn purchase(
    state: web::Data<HttpState>,
    payload: web::Json<PurchaseRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = PurchaseRequest::try_from(payload.into_inner())?;
    let order = state.purchases.purchase(request).await?;
    Ok(HttpResponse::Ok().json(PurchaseResponse {
        ok: true,
        message: PURCHASE_SUCCEEDED.to_owned(),
        order_id: order.id(),
        order,
    }))
}

/// Fetch a committed order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{orderId}",
    params(("orderId" = String, Path, format = Uuid, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 400, description = "Malformed order id", body = ErrorSchema),
        (status = 404, description = "Order not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "getOrder"
)]
#[get("/orders/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let order_id = parse_order_id(&path.into_inner(), FieldName::new("orderId"))?;
    let order = state.orders.get_order(order_id).await?;
    Ok(HttpResponse::Ok().json(OrderResponse { ok: true, order }))
}
