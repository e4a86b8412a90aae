//! API Routes
//!
//! HTTP endpoint definitions. Paths and methods mirror the public interface:
//! `/login`, `/account`, `/account/:id`, `/set-admin/:accountNumber`,
//! `/transfer`, `/transfer-history`.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::{authorize, policy::Action, Claims};
use crate::domain::{Account, Transfer};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    CreateAccountCommand, CreateAccountHandler, TransferCommand, TransferHandler,
};
use crate::store::{AccountStore, TransferLedger};

use super::middleware::{auth_middleware, logging_middleware, TOKEN_HEADER};
use super::{AppJson, AppState};

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub number: i64,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account: i64,
    pub to_account: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub from_account: i64,
    pub to_account: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetAdminResponse {
    pub success: bool,
}

// =========================================================================
// API Router
// =========================================================================

/// Build the full application router.
///
/// `/login`, `GET /account`, and `/health` are open; everything else sits
/// behind the token-validation middleware. `POST /account` validates its
/// token in the handler because it shares a path with the open list route.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/account/:id", get(get_account_by_id).delete(delete_account))
        .route("/set-admin/:account_number", post(set_admin))
        .route("/transfer-history", get(transfer_history))
        .route("/transfer", any(transfer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/account", get(list_accounts).post(create_account))
        .merge(protected)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// POST /login
// =========================================================================

/// Look up the account by number, verify the password, issue a token.
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let store = AccountStore::new(state.pool);

    let account = store.get_by_number(request.number).await?;

    if !account.valid_password(&request.password) {
        return Err(AppError::Unauthenticated);
    }

    let token = state
        .auth
        .issue_token(&account)
        .map_err(|e| AppError::Internal(format!("token issuance failed: {e}")))?;

    Ok(Json(LoginResponse {
        number: account.number,
        token,
    }))
}

// =========================================================================
// GET /account
// =========================================================================

/// List all accounts. Open to unauthenticated callers.
async fn list_accounts(State(state): State<AppState>) -> AppResult<Json<Vec<Account>>> {
    let store = AccountStore::new(state.pool);

    let accounts = store.list().await?;

    Ok(Json(accounts))
}

// =========================================================================
// POST /account
// =========================================================================

/// Create an account. Admin-gated, signups included.
async fn create_account(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> AppResult<Json<Account>> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::PermissionDenied)?;
    let claims = state.auth.verify_token(token)?;

    let handler = CreateAccountHandler::new(state.pool);

    let command = CreateAccountCommand::new(request.first_name, request.last_name)
        .with_password(request.password)
        .with_balance(request.balance)
        .with_admin(request.is_admin);

    let account = handler.execute(command, &claims).await?;

    Ok(Json(account))
}

// =========================================================================
// GET /account/:id
// =========================================================================

/// Fetch a single account by row id (admin only).
async fn get_account_by_id(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> AppResult<Json<Account>> {
    authorize(&claims, Action::GetAccount)?;

    let id = parse_id(&id)?;
    let store = AccountStore::new(state.pool);

    let account = store.get(id).await?;

    Ok(Json(account))
}

// =========================================================================
// DELETE /account/:id
// =========================================================================

/// Delete an account by row id (admin only).
async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    authorize(&claims, Action::DeleteAccount)?;

    let id = parse_id(&id)?;
    let store = AccountStore::new(state.pool);

    store.delete(id).await?;

    tracing::info!(id, "account deleted");

    Ok(Json(DeleteResponse { deleted: id }))
}

// =========================================================================
// POST /set-admin/:account_number
// =========================================================================

/// Promote the target account to admin. The caller must hold an admin token
/// AND its stored account record must still carry the admin flag (the claim
/// can outlive a demotion of the row). No demotion path exists.
async fn set_admin(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(account_number): Path<String>,
) -> AppResult<Json<SetAdminResponse>> {
    authorize(&claims, Action::SetAdmin)?;

    let account_number: i64 = account_number.parse().map_err(|_| {
        AppError::InvalidRequest(format!("invalid account number given: {account_number}"))
    })?;

    let store = AccountStore::new(state.pool);

    let caller = store.get_by_number(claims.account_number).await?;
    if !caller.is_admin {
        return Err(AppError::Forbidden(
            "you must be an admin to set admin status".to_string(),
        ));
    }

    let mut target = store.get_by_number(account_number).await?;
    target.is_admin = true;
    store.update(&target).await?;

    tracing::info!(number = account_number, "account promoted to admin");

    Ok(Json(SetAdminResponse { success: true }))
}

// =========================================================================
// /transfer (any method)
// =========================================================================

/// Move funds between accounts. The token must name the source account.
async fn transfer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(request): AppJson<TransferRequest>,
) -> AppResult<Json<TransferResponse>> {
    let handler = TransferHandler::new(state.pool);

    let command = TransferCommand::new(request.from_account, request.to_account, request.amount);

    let outcome = handler.execute(command, &claims).await?;

    Ok(Json(TransferResponse {
        from_account: outcome.from_account,
        to_account: outcome.to_account,
        amount: outcome.amount,
    }))
}

// =========================================================================
// GET /transfer-history
// =========================================================================

/// Full ledger, unfiltered (admin only).
async fn transfer_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<Transfer>>> {
    authorize(&claims, Action::TransferHistory)?;

    let ledger = TransferLedger::new(state.pool);

    let transfers = ledger.list().await?;

    Ok(Json(transfers))
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::InvalidRequest(format!("invalid id given {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let json = r#"{"number": 254244, "password": "hunter2"}"#;

        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.number, 254244);
        assert_eq!(request.password, "hunter2");
    }

    #[test]
    fn test_create_account_request_defaults() {
        let json = r#"{"firstName": "Goggi", "lastName": "Puttar"}"#;

        let request: CreateAccountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.first_name, "Goggi");
        assert_eq!(request.last_name, "Puttar");
        assert_eq!(request.password, "");
        assert_eq!(request.balance, 0);
        assert!(!request.is_admin);
    }

    #[test]
    fn test_transfer_request_wire_names() {
        let json = r#"{"fromAccount": 111, "toAccount": 222, "amount": 40}"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.from_account, 111);
        assert_eq!(request.to_account, 222);
        assert_eq!(request.amount, 40);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("12").is_ok());
        assert!(matches!(
            parse_id("twelve"),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
