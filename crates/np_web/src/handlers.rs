use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use np_core::analytics::ArticleStats;
use np_core::{paginate, Article, ArticleFilter, Category, Page, PayoutReport, Principal, RateConfig};
use np_export::ExportFormat;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Header carrying the e-mail of the user the identity provider signed in.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub keyword: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<usize>,
}

impl ArticleQuery {
    fn filter(&self) -> ArticleFilter {
        ArticleFilter {
            keyword: self.keyword.clone(),
            author: self.author.clone(),
            category: self.category.as_deref().map(Category::from),
            ..ArticleFilter::default()
        }
        .with_dates(self.from, self.to)
    }
}

#[derive(Debug, Deserialize)]
pub struct RateUpdate {
    pub rate: f64,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<Page<Article>>> {
    let articles = state.service.articles(&query.filter()).await?;
    let page = paginate(&articles, query.page.unwrap_or(1), state.articles_per_page);
    Ok(Json(page))
}

pub async fn article_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<ArticleStats>> {
    let articles = state.service.articles(&query.filter()).await?;
    Ok(Json(ArticleStats::from_articles(&articles)))
}

pub async fn payout_report(State(state): State<Arc<AppState>>) -> ApiResult<Json<PayoutReport>> {
    Ok(Json(state.service.report().await?))
}

pub async fn export_payouts(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
) -> ApiResult<Response> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: np_export::ExportError| ApiError::bad_request(e.to_string()))?;
    let report = state.service.report().await?;
    let bytes = np_export::export(&report, format, &state.export)?;

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, bytes).into_response())
}

pub async fn get_rates(State(state): State<Arc<AppState>>) -> ApiResult<Json<RateConfig>> {
    Ok(Json(state.service.load_rates().await?))
}

pub async fn update_rate(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    headers: HeaderMap,
    Json(update): Json<RateUpdate>,
) -> ApiResult<Json<RateConfig>> {
    let principal = principal(&headers)?;
    let rates = state
        .service
        .update_rate(&principal, &Category::from(category), update.rate)
        .await?;
    Ok(Json(rates))
}

fn principal(headers: &HeaderMap) -> ApiResult<Principal> {
    headers
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(Principal::new)
        .ok_or_else(|| ApiError::unauthorized(format!("missing {} header", USER_EMAIL_HEADER)))
}
