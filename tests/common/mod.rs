#![allow(dead_code)]
//! Shared test fixtures: an in-memory `TableStore` double with the same
//! conditional semantics as the real backend, plus service builders.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use account_api::repos::store::{StoreResult, TableStore};
use account_api::repos::StoreError;
use account_api::services::accounts::{AccountService, EventWriter};
use account_api::services::auth::AuthProviderClient;

pub const USERS_TABLE: &str = "users";
pub const USER_EVENTS_TABLE: &str = "userEvents";
pub const DASHBOARDS_TABLE: &str = "dashboards";

type Item = serde_json::Map<String, Value>;

/// In-memory table store double.
///
/// Implements the same conditional semantics as the production backend:
/// create-only puts, append-with-empty-list-default, replace-on-existing.
/// Two extra knobs drive the failure and race tests:
/// - `fail_table` makes every operation on one table error out
/// - `freeze_reads` serves reads from a snapshot while writes keep going
///   to live state, emulating interleaved read-modify-write
#[derive(Default)]
pub struct InMemoryStore {
    items: Mutex<HashMap<String, Item>>,
    frozen_reads: Mutex<Option<HashMap<String, Item>>>,
    failing_tables: Mutex<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn item_key(table: &str, key: &str) -> String {
        format!("{}:{}", table, key)
    }

    fn check_failure(&self, table: &str) -> StoreResult<()> {
        if self.failing_tables.lock().unwrap().contains(table) {
            return Err(StoreError::BackendCommand(format!(
                "injected failure for table {}",
                table
            )));
        }
        Ok(())
    }

    /// Make every operation on `table` fail.
    pub fn fail_table(&self, table: &str) {
        self.failing_tables.lock().unwrap().insert(table.to_string());
    }

    /// Serve all reads from a snapshot of the current state. Writes still
    /// land in live state, so every reader sees the pre-write world.
    pub fn freeze_reads(&self) {
        let snapshot = self.items.lock().unwrap().clone();
        *self.frozen_reads.lock().unwrap() = Some(snapshot);
    }

    pub fn thaw_reads(&self) {
        *self.frozen_reads.lock().unwrap() = None;
    }

    pub fn seed(&self, table: &str, key: &str, item: Value) {
        let obj = item.as_object().expect("seed item must be an object").clone();
        self.items
            .lock()
            .unwrap()
            .insert(Self::item_key(table, key), obj);
    }

    /// Number of items currently stored in `table`.
    pub fn table_len(&self, table: &str) -> usize {
        let prefix = format!("{}:", table);
        self.items
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .count()
    }

    /// Read one item from live state, bypassing any frozen snapshot.
    pub fn live_item(&self, table: &str, key: &str) -> Option<Value> {
        self.items
            .lock()
            .unwrap()
            .get(&Self::item_key(table, key))
            .cloned()
            .map(Value::Object)
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        self.check_failure(table)?;

        let k = Self::item_key(table, key);
        let frozen = self.frozen_reads.lock().unwrap();
        let item = match frozen.as_ref() {
            Some(snapshot) => snapshot.get(&k).cloned(),
            None => self.items.lock().unwrap().get(&k).cloned(),
        };

        Ok(item.map(Value::Object))
    }

    async fn put_item_if_absent(&self, table: &str, key: &str, item: &Value) -> StoreResult<bool> {
        self.check_failure(table)?;

        let obj = item
            .as_object()
            .ok_or_else(|| StoreError::InvalidItem("item must be a JSON object".into()))?;

        let mut items = self.items.lock().unwrap();
        let k = Self::item_key(table, key);
        if items.contains_key(&k) {
            return Ok(false);
        }
        items.insert(k, obj.clone());

        Ok(true)
    }

    async fn list_append(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<bool> {
        self.check_failure(table)?;

        let mut items = self.items.lock().unwrap();
        let Some(item) = items.get_mut(&Self::item_key(table, key)) else {
            return Ok(false);
        };

        let list = item
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match list {
            Value::Array(entries) => entries.push(value.clone()),
            _ => {
                return Err(StoreError::InvalidItem(format!(
                    "attribute {} is not a list",
                    field
                )));
            }
        }

        Ok(true)
    }

    async fn list_replace(
        &self,
        table: &str,
        key: &str,
        field: &str,
        values: &Value,
    ) -> StoreResult<bool> {
        self.check_failure(table)?;

        let mut items = self.items.lock().unwrap();
        let Some(item) = items.get_mut(&Self::item_key(table, key)) else {
            return Ok(false);
        };

        item.insert(field.to_string(), values.clone());

        Ok(true)
    }
}

/// Provider client pointed at a black-hole address; tests that exercise
/// the provider use httpmock instead of this.
pub fn unreachable_provider() -> AuthProviderClient {
    AuthProviderClient::new(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9/login").unwrap(),
        Url::parse("http://127.0.0.1:9/user/create").unwrap(),
        Url::parse("http://127.0.0.1:9/login/refresh").unwrap(),
        "service-jwt".to_string(),
    )
}

pub fn account_service(store: Arc<InMemoryStore>) -> AccountService {
    let events = EventWriter::new(store.clone(), USER_EVENTS_TABLE);
    AccountService::new(
        store,
        unreachable_provider(),
        events,
        USERS_TABLE,
        DASHBOARDS_TABLE,
    )
}

pub fn seed_user(store: &InMemoryStore, user_id: &str, first_name: &str, dashboards: &[&str]) {
    store.seed(
        USERS_TABLE,
        user_id,
        json!({
            "userID": user_id,
            "firstName": first_name,
            "dashboards": dashboards,
            "subscriptions": [],
        }),
    );
}

pub fn user_dashboards(store: &InMemoryStore, user_id: &str) -> Vec<String> {
    let item = store
        .live_item(USERS_TABLE, user_id)
        .expect("user should exist");
    serde_json::from_value(item["dashboards"].clone()).expect("dashboards should be a string list")
}
