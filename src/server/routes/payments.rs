//! Payment endpoints

use super::{DispatchQuery, dispatch};
use crate::core::types::{ChargeRequest, PaymentRequest, ProviderRequest, RefundRequest};
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/charges", web::post().to(create_charge))
            .route("/charges/{id}", web::get().to(get_charge))
            .route("/refunds", web::post().to(refund_charge)),
    );
}

/// POST /api/v1/payments/charges
pub async fn create_charge(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<ChargeRequest>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Payment(PaymentRequest::CreateCharge(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// GET /api/v1/payments/charges/{id}
pub async fn get_charge(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Payment(PaymentRequest::GetCharge {
        charge_id: path.into_inner(),
    });
    dispatch(&state, request, &query).await
}

/// POST /api/v1/payments/refunds
pub async fn refund_charge(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<RefundRequest>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Payment(PaymentRequest::RefundCharge(body.into_inner()));
    dispatch(&state, request, &query).await
}
