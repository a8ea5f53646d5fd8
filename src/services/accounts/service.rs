use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::repos::dashboard_repo::{self, DashboardRecord};
use crate::repos::user_repo::{self, UserRecord};
use crate::repos::{StoreError, TableStore};
use crate::services::accounts::events::EventWriter;
use crate::services::auth::{AuthError, AuthProviderClient, NewUserDescriptor};

/// Failures of the record-store workflows.
///
/// Raw store detail never crosses this boundary unwrapped: everything is
/// re-tagged here so callers only see this taxonomy.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("user not found")]
    UserNotFound,
    #[error("id collision: {0}")]
    IdCollision(String),
    /// The dashboard id was appended to the user but the dashboard record
    /// itself could not be created. The append is NOT rolled back; the
    /// distinct tag lets callers retry or reconcile.
    #[error("dashboard {dashboard_id} registered to user but record creation failed")]
    DashboardRecordIncomplete {
        dashboard_id: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the account workflows over the auth authority, the record
/// stores and the audit event writer.
///
/// - Credential checks and token signing are delegated to the authority.
/// - Record-store access goes through the injected `TableStore` handle.
/// - No operation retries internally; id-collision retries are the
///   caller's responsibility.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn TableStore>,
    provider: AuthProviderClient,
    events: EventWriter,
    users_table: String,
    dashboards_table: String,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn TableStore>,
        provider: AuthProviderClient,
        events: EventWriter,
        users_table: impl Into<String>,
        dashboards_table: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            events,
            users_table: users_table.into(),
            dashboards_table: dashboards_table.into(),
        }
    }

    /// Delegate a credential login to the auth authority.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        self.provider.login(email, password).await
    }

    /// Forward the current (already gate-validated) token for re-issue.
    pub async fn refresh_token(&self, current_token: &str) -> Result<String, AuthError> {
        self.provider.refresh(current_token).await
    }

    /// Register a new account with the auth authority.
    pub async fn register_new_user(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<NewUserDescriptor, AuthError> {
        self.provider
            .create_user(email, password, first_name, last_name)
            .await
    }

    /// Read a user record.
    ///
    /// On success a best-effort `accessedAccount` event is recorded on a
    /// detached task; its outcome never affects this call. The not-found
    /// path records nothing.
    pub async fn get_user(&self, user_id: &str) -> Result<UserRecord, AccountError> {
        let user = user_repo::get(self.store.as_ref(), &self.users_table, user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        self.events.record_access_detached(user_id);

        Ok(user)
    }

    /// Create a dashboard and associate it with the user.
    ///
    /// Order matters: the id is appended to the user's list with the
    /// store's atomic list-append (safe under concurrent appends), then
    /// the dashboard record is created with a create-only write. A record
    /// failure after the append is surfaced as
    /// `DashboardRecordIncomplete` and the append stays in place.
    pub async fn register_new_dashboard(
        &self,
        user_id: &str,
        dashboard_name: &str,
    ) -> Result<String, AccountError> {
        let dashboard_id = Uuid::now_v7().to_string();

        user_repo::get(self.store.as_ref(), &self.users_table, user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let appended = user_repo::append_dashboard(
            self.store.as_ref(),
            &self.users_table,
            user_id,
            &dashboard_id,
        )
        .await?;
        if !appended {
            // User vanished between the read and the append.
            return Err(AccountError::UserNotFound);
        }

        let record = DashboardRecord {
            dashboard_id: dashboard_id.clone(),
            dashboard_name: dashboard_name.to_string(),
            created_at: Utc::now().timestamp(),
        };

        match dashboard_repo::create(self.store.as_ref(), &self.dashboards_table, &record).await {
            Ok(true) => Ok(dashboard_id),
            Ok(false) => Err(AccountError::IdCollision(dashboard_id)),
            Err(err) => {
                error!(
                    user_id = %user_id,
                    dashboard_id = %dashboard_id,
                    error = %err,
                    "dashboard record creation failed after the user-side append"
                );
                Err(AccountError::DashboardRecordIncomplete {
                    dashboard_id,
                    source: err,
                })
            }
        }
    }

    /// Remove one occurrence of a dashboard id from the user's list.
    ///
    /// A non-present id is a no-op success. The new list is computed here
    /// and written back wholesale with no version check, so two
    /// concurrent removals for the same user can race and one removal can
    /// be lost (last writer wins). The dashboard record itself is never
    /// deleted.
    pub async fn remove_dashboard(
        &self,
        user_id: &str,
        dashboard_id: &str,
    ) -> Result<(), AccountError> {
        let user = user_repo::get(self.store.as_ref(), &self.users_table, user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let mut dashboards = user.dashboards;
        if let Some(pos) = dashboards.iter().position(|d| d == dashboard_id) {
            dashboards.remove(pos);
        }

        let replaced = user_repo::replace_dashboards(
            self.store.as_ref(),
            &self.users_table,
            user_id,
            &dashboards,
        )
        .await?;
        if !replaced {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }
}
