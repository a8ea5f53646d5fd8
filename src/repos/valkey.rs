use async_trait::async_trait;
use serde_json::Value;

use crate::repos::error::StoreError;
use crate::repos::store::{StoreResult, TableStore};

// Create the hash only when the key is absent. ARGV = field/value pairs.
const PUT_IF_ABSENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
for i = 1, #ARGV, 2 do
  redis.call('HSET', KEYS[1], ARGV[i], ARGV[i + 1])
end
return 1
"#;

// Append ARGV[2] (JSON) to the list attribute ARGV[1] of an existing item.
// A missing attribute becomes an empty list before the append.
const LIST_APPEND_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
local raw = redis.call('HGET', KEYS[1], ARGV[1])
local list
if raw then
  list = cjson.decode(raw)
else
  list = {}
end
table.insert(list, cjson.decode(ARGV[2]))
redis.call('HSET', KEYS[1], ARGV[1], cjson.encode(list))
return 1
"#;

// Replace the attribute ARGV[1] with ARGV[2] on an existing item.
const LIST_REPLACE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
return 1
"#;

/// Valkey/Redis-backed table store.
///
/// Each item is a hash at `"{table}:{key}"`; every attribute is stored as
/// its own JSON fragment so the list scripts never re-encode unrelated
/// attributes. Scripts run atomically per item, which is what gives
/// `put_item_if_absent` and `list_append` their conditional semantics.
#[derive(Clone, Debug)]
pub struct ValkeyTableStore {
    manager: redis::aio::ConnectionManager,
}

impl ValkeyTableStore {
    // Create a store client from a URL like `redis://localhost:6379`.
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        Ok(Self { manager })
    }

    fn item_key(table: &str, key: &str) -> String {
        format!("{}:{}", table, key)
    }

    fn encode_fragment(value: &Value) -> StoreResult<String> {
        serde_json::to_string(value).map_err(|e| StoreError::InvalidItem(e.to_string()))
    }
}

#[async_trait]
impl TableStore for ValkeyTableStore {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Value>> {
        let mut conn = self.manager.clone();

        // HGETALL returns an empty map for a missing key.
        let fields: std::collections::HashMap<String, String> = redis::cmd("HGETALL")
            .arg(Self::item_key(table, key))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        if fields.is_empty() {
            return Ok(None);
        }

        let mut item = serde_json::Map::new();
        for (name, raw) in fields {
            let value: Value = serde_json::from_str(&raw)
                .map_err(|e| StoreError::InvalidItem(format!("attribute {}: {}", name, e)))?;
            item.insert(name, value);
        }

        Ok(Some(Value::Object(item)))
    }

    async fn put_item_if_absent(&self, table: &str, key: &str, item: &Value) -> StoreResult<bool> {
        let fields = item
            .as_object()
            .ok_or_else(|| StoreError::InvalidItem("item must be a JSON object".into()))?;

        let mut conn = self.manager.clone();

        let script = redis::Script::new(PUT_IF_ABSENT_SCRIPT);
        let mut invocation = script.key(Self::item_key(table, key));
        for (name, value) in fields {
            invocation.arg(name).arg(Self::encode_fragment(value)?);
        }

        let created: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(created == 1)
    }

    async fn list_append(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<bool> {
        let mut conn = self.manager.clone();

        let appended: i64 = redis::Script::new(LIST_APPEND_SCRIPT)
            .key(Self::item_key(table, key))
            .arg(field)
            .arg(Self::encode_fragment(value)?)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(appended == 1)
    }

    async fn list_replace(
        &self,
        table: &str,
        key: &str,
        field: &str,
        values: &Value,
    ) -> StoreResult<bool> {
        let mut conn = self.manager.clone();

        let replaced: i64 = redis::Script::new(LIST_REPLACE_SCRIPT)
            .key(Self::item_key(table, key))
            .arg(field)
            .arg(Self::encode_fragment(values)?)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(replaced == 1)
    }
}
