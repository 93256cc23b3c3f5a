//! Transaction CRUD and summary endpoints
//!
//! All routes require an authenticated user; every query is scoped to the
//! caller's own transactions.

use crate::auth::AuthedUser;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::{Transaction, TransactionFilter, TransactionKind, TransactionSummary};
use crate::utils::error::{AppError, Result};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_CATEGORY_LEN: usize = 50;
const MAX_NOTE_LEN: usize = 200;
const DEFAULT_PAGE_LIMIT: usize = 50;
const MAX_PAGE_LIMIT: usize = 500;

/// Configure transaction routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/transactions")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/summary", web::get().to(summary))
            .route("/{id}", web::delete().to(delete)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ListQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            kind: self.kind,
            category: self.category.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl CreateTransaction {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if !self.amount.is_finite() || self.amount <= 0.0 {
            errors.push("Amount must be positive");
        }
        let category = self.category.trim();
        if category.is_empty() || category.len() > MAX_CATEGORY_LEN {
            errors.push("Category is required and must be less than 50 characters");
        }
        if let Some(note) = &self.note {
            if note.len() > MAX_NOTE_LEN {
                errors.push("Note must be less than 200 characters");
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join("; ")))
        }
    }
}

async fn list(
    user: AuthedUser,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);

    let (transactions, total) = state
        .transactions
        .list(&user.id, &query.filter(), page, limit);

    Ok(ApiResponse::success(TransactionPage {
        transactions,
        total_pages: total.div_ceil(limit),
        current_page: page,
        total,
    })
    .to_http_response())
}

async fn create(
    user: AuthedUser,
    state: web::Data<AppState>,
    body: web::Json<CreateTransaction>,
) -> Result<HttpResponse> {
    body.validate()?;

    let transaction = state.transactions.insert(Transaction {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        amount: body.amount,
        category: body.category.trim().to_string(),
        kind: body.kind,
        date: body.date.unwrap_or_else(Utc::now),
        note: body.note.clone(),
        created_at: Utc::now(),
    });

    Ok(HttpResponse::Created().json(ApiResponse::success(transaction)))
}

async fn delete(
    user: AuthedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let transaction_id = path.into_inner();
    if !state.transactions.delete(&user.id, &transaction_id) {
        return Err(AppError::NotFound("Transaction not found".to_string()));
    }

    Ok(ApiResponse::success(serde_json::json!({
        "message": "Transaction deleted successfully"
    }))
    .to_http_response())
}

async fn summary(
    user: AuthedUser,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let summary: TransactionSummary = state.transactions.summary(&user.id, &query.filter());
    Ok(ApiResponse::success(summary).to_http_response())
}
