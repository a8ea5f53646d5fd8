/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は検証済みトークンの `userID` claim
/// - `token` は scheme を剥いだ生トークン（refresh が上流へそのまま転送する）
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: String,
    pub token: String,
}

impl AuthCtx {
    pub fn new(user_id: String, token: String) -> Self {
        Self { user_id, token }
    }
}
