use crate::error::StoreError;
use crate::path::{segments, validate_key};
use crate::push_id::PushIdGenerator;
use crate::store::DocumentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

/// In-process document tree with the same semantics as the remote store.
///
/// Nulls and empty objects are never stored: writing one removes the node, and
/// parents left without children disappear with their last child.
pub struct MemoryStore {
    root: RwLock<Value>,
    ids: PushIdGenerator,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            root: RwLock::new(Value::Object(Map::new())),
            ids: PushIdGenerator::new(),
        }
    }

    /// Creates a store holding `root` as the whole tree.
    pub fn with_data(root: Value) -> Self {
        let store = MemoryStore::new();
        if root.is_object() {
            *store.root.write() = root;
        }
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(path: &str) -> Result<Vec<&str>, StoreError> {
    segments(path).map(validate_key).collect()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn lookup<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(node, |current, segment| current.as_object()?.get(*segment))
        .filter(|found| !is_empty(found))
}

fn write(root: &mut Value, path: &[&str], value: Value) {
    if is_empty(&value) {
        remove(root, path);
    } else {
        set(root, path, value);
    }
}

fn set(node: &mut Value, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *node = value;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(obj) = node {
        let child = obj.entry(first.to_string()).or_insert(Value::Null);
        set(child, rest, value);
    }
}

fn remove(node: &mut Value, path: &[&str]) {
    let Value::Object(obj) = node else {
        return;
    };

    match path {
        [] => obj.clear(),
        [last] => {
            obj.remove(*last);
        }
        [first, rest @ ..] => {
            if let Some(child) = obj.get_mut(*first) {
                remove(child, rest);
                if is_empty(child) {
                    obj.remove(*first);
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
        let mut target = parse(path)?;
        let key = self.ids.next_id()?;
        target.push(&key);

        write(&mut self.root.write(), &target, value.clone());
        Ok(key)
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let target = parse(path)?;
        Ok(lookup(&self.root.read(), &target).cloned())
    }

    async fn update(&self, path: &str, fields: &Map<String, Value>) -> Result<(), StoreError> {
        let target = parse(path)?;
        for key in fields.keys() {
            validate_key(key)?;
        }

        let mut root = self.root.write();
        for (key, value) in fields {
            let mut field_path = target.clone();
            field_path.push(key);
            write(&mut root, &field_path, value.clone());
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = parse(path)?;
        remove(&mut self.root.write(), &target);
        Ok(())
    }
}
