use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier scoping one independent [`NavigationController`] instance.
///
/// Partitions [`ContextRegistry`] storage so multiple windows/controllers
/// never see each other's parameters.
///
/// [`NavigationController`]: crate::nav::NavigationController
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerId(Uuid);

impl ControllerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ControllerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-instance key/value parameter store for one screen or modal instance.
///
/// Values are `serde_json::Value` so arbitrary payloads round-trip through
/// the command surface. Lookups never fail: `get` returns `None` for missing
/// keys. Interior locking makes a store shareable with async callbacks that
/// run off the UI thread.
#[derive(Debug, Default)]
pub struct ScreenContext {
    values: Mutex<HashMap<String, Value>>,
}

impl ScreenContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Typed accessor for values that were stored as serialized structs.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| serde_json::from_value(value).ok())
    }

    /// Returns the subset of `keys` that are present; missing keys are
    /// logged as a diagnostic, not an error.
    pub fn get_all(&self, keys: &[&str]) -> HashMap<String, Value> {
        let values = self.values.lock().unwrap();
        let mut found = HashMap::new();
        let mut missing = Vec::new();
        for &key in keys {
            match values.get(key) {
                Some(value) => {
                    found.insert(key.to_string(), value.clone());
                }
                None => missing.push(key),
            }
        }
        if !missing.is_empty() {
            log::debug!("requested keys missing from context: {:?}", missing);
        }
        found
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values.lock().unwrap().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().remove(key)
    }

    pub fn merge(&self, entries: HashMap<String, Value>) {
        if entries.is_empty() {
            return;
        }
        self.values.lock().unwrap().extend(entries);
    }

    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}

/// Owns one [`ScreenContext`] per `(controller, instance-id)` pair.
///
/// Stores are created lazily on first access; `get_or_create` is atomic per
/// key, so two near-simultaneous first accesses converge on one instance.
/// The registry is explicitly constructed and owned by its controller(s),
/// never process-wide state.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    stores: Mutex<HashMap<(ControllerId, String), Arc<ScreenContext>>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the same store for repeated calls with the same pair.
    pub fn get_or_create(&self, controller: ControllerId, instance: &str) -> Arc<ScreenContext> {
        self.stores
            .lock()
            .unwrap()
            .entry((controller, instance.to_string()))
            .or_insert_with(|| Arc::new(ScreenContext::new()))
            .clone()
    }

    pub fn get(&self, controller: ControllerId, instance: &str) -> Option<Arc<ScreenContext>> {
        self.stores
            .lock()
            .unwrap()
            .get(&(controller, instance.to_string()))
            .cloned()
    }

    /// Removes the store for one instance. Returns whether one existed.
    pub fn clear(&self, controller: ControllerId, instance: &str) -> bool {
        self.stores
            .lock()
            .unwrap()
            .remove(&(controller, instance.to_string()))
            .is_some()
    }

    /// Removes every store owned by `controller`.
    pub fn clear_all(&self, controller: ControllerId) {
        self.stores
            .lock()
            .unwrap()
            .retain(|(owner, _), _| *owner != controller);
    }

    pub fn len(&self) -> usize {
        self.stores.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_or_create_returns_same_store() {
        let registry = ContextRegistry::new();
        let controller = ControllerId::new();

        let first = registry.get_or_create(controller, "home");
        first.set("tab", json!(2));

        let second = registry.get_or_create(controller, "home");
        assert_eq!(second.get("tab"), Some(json!(2)));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn contexts_are_isolated_per_controller() {
        let registry = ContextRegistry::new();
        let left = ControllerId::new();
        let right = ControllerId::new();

        registry.get_or_create(left, "settings").set("theme", json!("dark"));
        registry.get_or_create(right, "settings").set("theme", json!("light"));

        assert_eq!(registry.get_or_create(left, "settings").get("theme"), Some(json!("dark")));
        assert_eq!(registry.get_or_create(right, "settings").get("theme"), Some(json!("light")));
    }

    #[test]
    fn get_returns_none_for_missing_keys() {
        let ctx = ScreenContext::new();
        assert_eq!(ctx.get("absent"), None);
        assert_eq!(ctx.get_as::<String>("absent"), None);
    }

    #[test]
    fn get_all_returns_present_subset() {
        let ctx = ScreenContext::new();
        ctx.set("a", json!(1));
        ctx.set("b", json!(2));

        let found = ctx.get_all(&["a", "b", "c"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found.get("a"), Some(&json!(1)));
        assert!(!found.contains_key("c"));
    }

    #[test]
    fn clear_all_removes_only_one_controllers_stores() {
        let registry = ContextRegistry::new();
        let left = ControllerId::new();
        let right = ControllerId::new();

        registry.get_or_create(left, "home");
        registry.get_or_create(left, "tasks");
        registry.get_or_create(right, "home");

        registry.clear_all(left);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(right, "home").is_some());
        assert!(registry.get(left, "home").is_none());
    }

    #[test]
    fn clear_removes_single_instance() {
        let registry = ContextRegistry::new();
        let controller = ControllerId::new();

        registry.get_or_create(controller, "modal#0");
        assert!(registry.clear(controller, "modal#0"));
        assert!(!registry.clear(controller, "modal#0"));
    }

    #[test]
    fn merge_overwrites_existing_keys() {
        let ctx = ScreenContext::new();
        ctx.set("who", json!("alice"));
        ctx.merge(HashMap::from([
            ("who".to_string(), json!("bob")),
            ("points".to_string(), json!(10)),
        ]));
        assert_eq!(ctx.get("who"), Some(json!("bob")));
        assert_eq!(ctx.len(), 2);
    }
}
