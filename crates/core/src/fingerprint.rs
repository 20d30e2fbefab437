//! Request parameters and their fingerprint
//!
//! A fingerprint identifies a parameter set by its field values only. It is the
//! lowercase hex MD5 digest of the compact JSON encoding of the parameters with
//! keys sorted lexicographically, so the order in which fields were supplied
//! never changes it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The five parameters of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSet {
    pub int1: u64,
    pub int2: u64,
    pub limit: u64,
    pub str1: String,
    pub str2: String,
}

impl ParameterSet {
    pub fn new(
        int1: u64,
        int2: u64,
        limit: u64,
        str1: impl Into<String>,
        str2: impl Into<String>,
    ) -> Self {
        Self {
            int1,
            int2,
            limit,
            str1: str1.into(),
            str2: str2.into(),
        }
    }

    /// Parameters as a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("int1".to_string(), Value::from(self.int1));
        map.insert("int2".to_string(), Value::from(self.int2));
        map.insert("limit".to_string(), Value::from(self.limit));
        map.insert("str1".to_string(), Value::from(self.str1.as_str()));
        map.insert("str2".to_string(), Value::from(self.str2.as_str()));
        map
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(self)
    }
}

/// Fingerprint of a parameter set.
pub fn fingerprint(params: &ParameterSet) -> String {
    fingerprint_map(&params.to_map())
}

/// Fingerprint of an untyped parameter object.
///
/// Keys are sorted before encoding, whatever order the map keeps them in.
pub fn fingerprint_map(params: &Map<String, Value>) -> String {
    // `Map` only iterates sorted without serde_json's `preserve_order` feature.
    let mut fields: Vec<(&String, &Value)> = params.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let canonical: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let encoded = Value::Object(canonical).to_string();
    format!("{:x}", md5::compute(encoded.as_bytes()))
}
