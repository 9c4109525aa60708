use actix_web::{web, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;

use sp_core::domain::{UpstreamAction, UpstreamResponse};
use sp_core::errors::ProxyResult;
use sp_shared::mask_token;

use super::AppState;
use crate::dto::{ActionQuery, ActivationQuery, GetNumberQuery};
use crate::handlers::ApiError;

/// Handler for GET /
///
/// Dispatches on the `action` query parameter to one of the four proxy
/// operations. Successful responses are the provider's JSON payload, unchanged.
///
/// # Query
///
/// - `getNumber`: `country`, `service`, `token`, optional `rent_time` (hours)
/// - `getSms`, `cancelNumber`, `getStatus`: `token`, `activation`
///
/// # Errors
///
/// - 400 for an unknown action, invalid parameters or a provider error
/// - 429 when the per-IP limit for the action is exhausted
/// - 503 while the circuit is open or the provider is unreachable
pub async fn dispatch(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let action = parse_action(&req)?;
    let proxy = &state.proxy;

    let result: ProxyResult<UpstreamResponse> = match action {
        UpstreamAction::GetNumber => {
            let params = parse_query::<GetNumberQuery>(&req)?.into_params()?;
            tracing::debug!(
                action = %action,
                country = %params.country,
                service = %params.service,
                token = %mask_token(&params.token),
                "Dispatching request"
            );
            proxy.get_number(&params).await
        }
        UpstreamAction::GetSms | UpstreamAction::CancelNumber | UpstreamAction::GetStatus => {
            let (token, activation) = parse_query::<ActivationQuery>(&req)?.into_parts()?;
            tracing::debug!(
                action = %action,
                activation = %activation,
                token = %mask_token(&token),
                "Dispatching request"
            );
            match action {
                UpstreamAction::GetSms => proxy.get_sms(&token, &activation).await,
                UpstreamAction::CancelNumber => proxy.cancel_number(&token, &activation).await,
                _ => proxy.get_status(&token, &activation).await,
            }
        }
    };

    let payload = result?;
    Ok(HttpResponse::Ok().json(payload))
}

fn parse_action(req: &HttpRequest) -> Result<UpstreamAction, ApiError> {
    web::Query::<ActionQuery>::from_query(req.query_string())
        .ok()
        .and_then(|query| query.into_inner().action)
        .and_then(|action| action.parse().ok())
        .ok_or(ApiError::InvalidAction)
}

fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> Result<T, ApiError> {
    web::Query::<T>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .map_err(|e| ApiError::Validation(e.to_string()))
}
