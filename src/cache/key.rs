//! Deterministic, order-independent cache-key hashing (spec §4.2).

use sha2::{Digest, Sha256};

/// Hashes a serializable value to a short hex digest. Serialization through
/// `serde_json::to_vec` is not guaranteed to sort map keys, so callers must
/// only pass values whose field order is fixed at the type level (structs,
/// not `HashMap`) — every `relevant_for_cache()` projection in this crate is
/// a plain struct for exactly this reason.
pub fn hash_value<T: serde::Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).expect("cache key values are always serializable");
    hex::encode(Sha256::digest(&bytes))
}

/// Builds the chat cache key shape from spec §4.2:
/// `llm:<modelId>:<hash(messages)>:<hash(relevantOptions)>`.
pub fn chat_cache_key(model_id: &str, messages_hash: &str, options_hash: &str) -> String {
    format!("llm:{model_id}:{messages_hash}:{options_hash}")
}

/// Builds the embedding cache key shape from spec §4.2:
/// `embedding:<hash(input[s])>:model:<modelId>:options:<hash(relevantOptions)>`.
pub fn embedding_cache_key(input_hash: &str, model_id: &str, options_hash: &str) -> String {
    format!("embedding:{input_hash}:model:{model_id}:options:{options_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Fixture {
        a: u32,
        b: &'static str,
    }

    #[test]
    fn hash_is_deterministic() {
        let f1 = Fixture { a: 1, b: "x" };
        let f2 = Fixture { a: 1, b: "x" };
        assert_eq!(hash_value(&f1), hash_value(&f2));
    }

    #[test]
    fn hash_is_content_sensitive() {
        let f1 = Fixture { a: 1, b: "x" };
        let f2 = Fixture { a: 2, b: "x" };
        assert_ne!(hash_value(&f1), hash_value(&f2));
    }

    #[test]
    fn key_shapes() {
        assert_eq!(chat_cache_key("m", "mh", "oh"), "llm:m:mh:oh");
        assert_eq!(
            embedding_cache_key("ih", "m", "oh"),
            "embedding:ih:model:m:options:oh"
        );
    }
}
