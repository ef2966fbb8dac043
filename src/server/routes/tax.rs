//! Tax endpoints

use super::{DispatchQuery, dispatch};
use crate::core::types::{Address, ProviderRequest, TaxCalculation, TaxRequest, TaxTransaction};
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tax")
            .route("/calculate", web::post().to(calculate_tax))
            .route("/validate-address", web::post().to(validate_address))
            .route("/rates", web::post().to(get_tax_rates))
            .route("/transactions", web::post().to(create_transaction))
            .route(
                "/transactions/{id}/commit",
                web::post().to(commit_transaction),
            )
            .route("/transactions/{id}/void", web::post().to(void_transaction)),
    );
}

#[derive(Debug, Default, Deserialize)]
pub struct VoidBody {
    pub reason: Option<String>,
}

/// POST /api/v1/tax/calculate
pub async fn calculate_tax(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<TaxCalculation>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Tax(TaxRequest::CalculateTax(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// POST /api/v1/tax/validate-address
pub async fn validate_address(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<Address>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Tax(TaxRequest::ValidateAddress(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// POST /api/v1/tax/rates
pub async fn get_tax_rates(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<Address>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Tax(TaxRequest::GetTaxRates(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// POST /api/v1/tax/transactions
pub async fn create_transaction(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    body: web::Json<TaxTransaction>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Tax(TaxRequest::CreateTransaction(body.into_inner()));
    dispatch(&state, request, &query).await
}

/// POST /api/v1/tax/transactions/{id}/commit
pub async fn commit_transaction(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let request = ProviderRequest::Tax(TaxRequest::CommitTransaction {
        transaction_id: path.into_inner(),
    });
    dispatch(&state, request, &query).await
}

/// POST /api/v1/tax/transactions/{id}/void
///
/// The body is optional.
pub async fn void_transaction(
    state: web::Data<AppState>,
    query: web::Query<DispatchQuery>,
    path: web::Path<String>,
    body: Option<web::Json<VoidBody>>,
) -> Result<HttpResponse> {
    let reason = body.and_then(|b| b.into_inner().reason);
    let request = ProviderRequest::Tax(TaxRequest::VoidTransaction {
        transaction_id: path.into_inner(),
        reason,
    });
    dispatch(&state, request, &query).await
}
