//! Handler for `GET /subscriptions/total-cost`.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use subtrack_core::{
  SubscriptionService, ValidationError, cost::CostQuery, parse_month_year,
  store::SubscriptionStore,
};

use crate::{
  dto::{TotalCost, non_empty},
  error::ApiError,
  extract::QueryParams,
};

#[derive(Debug, Deserialize)]
pub struct TotalCostParams {
  pub user_id:      Option<String>,
  pub service_name: Option<String>,
  /// Required, `MM-YYYY`.
  pub start_date:   Option<String>,
  /// Required, `MM-YYYY`.
  pub end_date:     Option<String>,
}

/// `GET /subscriptions/total-cost?start_date=MM-YYYY&end_date=MM-YYYY[&user_id=...][&service_name=...]`
pub async fn total<S>(
  State(service): State<Arc<SubscriptionService<S>>>,
  QueryParams(params): QueryParams<TotalCostParams>,
) -> Result<Json<TotalCost>, ApiError>
where
  S: SubscriptionStore,
{
  let start = non_empty(params.start_date)
    .ok_or(ValidationError::MissingField("start_date"))?;
  let end = non_empty(params.end_date)
    .ok_or(ValidationError::MissingField("end_date"))?;

  let query = CostQuery {
    user_id:      non_empty(params.user_id),
    service_name: non_empty(params.service_name),
    window_start: parse_month_year(&start)?,
    window_end:   parse_month_year(&end)?,
  };

  let total_cost = service.total_cost(&query).await?;
  Ok(Json(TotalCost { total_cost }))
}
