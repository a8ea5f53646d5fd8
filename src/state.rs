/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::accounts::AccountService;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>, accounts: Arc<AccountService>) -> Self {
        Self { verifier, accounts }
    }
}
