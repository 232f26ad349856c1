use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NAME: &str = "nome";
const PHONE: &str = "telefone";
const ADDRESS: &str = "endereco";

/// The mutable part of an item. This is exactly what gets stored under the item's key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: i64,
    #[serde(rename = "endereco")]
    pub address: String,
}

// Stored documents are read leniently: the store is schemaless and older
// records may lack a field.
#[derive(Default, Deserialize)]
#[serde(default)]
struct StoredFields {
    nome: String,
    telefone: i64,
    endereco: String,
}

impl From<StoredFields> for ItemFields {
    fn from(stored: StoredFields) -> Self {
        ItemFields {
            name: stored.nome,
            phone: stored.telefone,
            address: stored.endereco,
        }
    }
}

impl ItemFields {
    /// Decodes a request body. All three fields are required; an `id` is ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Decodes a document read back from the store. Missing fields take zero values.
    pub fn from_stored(document: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<StoredFields>(document).map(Into::into)
    }

    /// The fields as a store document, for both the initial write and merges.
    pub fn to_document(&self) -> Map<String, Value> {
        Map::from_iter([
            (NAME.to_string(), Value::from(self.name.as_str())),
            (PHONE.to_string(), Value::from(self.phone)),
            (ADDRESS.to_string(), Value::from(self.address.as_str())),
        ])
    }
}

/// An item as returned to callers: the stored fields plus the key they live under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(flatten)]
    pub fields: ItemFields,
}
