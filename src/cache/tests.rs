// (C) Coralbits SL 2025
// This file is part of Cachetrace and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ctor::ctor;

    use crate::cache::{replay, Cache};
    use crate::store::{InMemStore, Store};
    use crate::types::{CacheError, Value};
    use crate::utils::setup_logging;

    #[ctor]
    fn setup_logging_() {
        setup_logging(true);
    }

    fn new_cache() -> (Arc<dyn Store + Send + Sync>, Cache) {
        let store: Arc<dyn Store + Send + Sync> = Arc::new(InMemStore::new());
        let cache = Cache::new(store.clone());
        (store, cache)
    }

    #[tokio::test]
    async fn test_round_trip_identity() {
        let (_, cache) = new_cache();

        let key = cache.store("foo".into()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"foo".to_vec()));

        let key = cache.store(vec![0x01u8, 0x02, 0xff].into()).await.unwrap();
        assert_eq!(
            cache.get(&key).await.unwrap(),
            Some(vec![0x01u8, 0x02, 0xff])
        );

        let key = cache.store(42i64.into()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"42".to_vec()));

        let key = cache.store(3.5f64.into()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"3.5".to_vec()));
    }

    #[tokio::test]
    async fn test_get_absent_key_returns_none() {
        let (_, cache) = new_cache();
        let ret = cache.get("no-such-key").await.unwrap();
        assert_eq!(ret, None);
    }

    #[tokio::test]
    async fn test_counter_matches_history_length() {
        let (store, cache) = new_cache();

        for value in ["a", "b", "c"] {
            cache.store(value.into()).await.unwrap();
        }

        let count = store.get(Cache::STORE_METHOD).await.unwrap();
        assert_eq!(count, Some(b"3".to_vec()));

        let inputs_key = format!("{}:inputs", Cache::STORE_METHOD);
        let outputs_key = format!("{}:outputs", Cache::STORE_METHOD);
        let inputs = store.lrange(&inputs_key, 0, -1).await.unwrap();
        let outputs = store.lrange(&outputs_key, 0, -1).await.unwrap();
        assert_eq!(inputs.len(), 3);
        assert_eq!(outputs.len(), 3);
    }

    #[tokio::test]
    async fn test_get_str_decodes_utf8() {
        let (store, cache) = new_cache();
        let key = cache.store("héllo".into()).await.unwrap();

        let ret = cache.get_str(&key).await.unwrap();
        assert_eq!(ret, Some("héllo".to_string()));

        // get_str carries both wrappers too
        let count = store.get(Cache::GET_STR_METHOD).await.unwrap();
        assert_eq!(count, Some(b"1".to_vec()));
        let inputs_key = format!("{}:inputs", Cache::GET_STR_METHOD);
        let inputs = store.lrange(&inputs_key, 0, -1).await.unwrap();
        assert_eq!(inputs, vec![format!("({:?},)", key).into_bytes()]);

        // outputs carry the plain form, no quoting
        let outputs_key = format!("{}:outputs", Cache::GET_STR_METHOD);
        let outputs = store.lrange(&outputs_key, 0, -1).await.unwrap();
        assert_eq!(outputs, vec!["héllo".as_bytes().to_vec()]);
    }

    #[tokio::test]
    async fn test_get_str_invalid_utf8_is_conversion_error() {
        let (_, cache) = new_cache();
        let key = cache.store(vec![0xffu8, 0xfe].into()).await.unwrap();
        let err = cache.get_str(&key).await.unwrap_err();
        assert!(matches!(err, CacheError::Conversion { .. }));
    }

    #[tokio::test]
    async fn test_get_int_parses_numeric_text() {
        let (_, cache) = new_cache();
        let key = cache.store(42i64.into()).await.unwrap();
        assert_eq!(cache.get_int(&key).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_get_int_non_numeric_is_conversion_error() {
        let (_, cache) = new_cache();
        let key = cache.store("foo".into()).await.unwrap();
        let err = cache.get_int(&key).await.unwrap_err();
        assert!(matches!(err, CacheError::Conversion { .. }));
    }

    #[tokio::test]
    async fn test_get_int_absent_key_returns_none() {
        let (_, cache) = new_cache();
        assert_eq!(cache.get_int("no-such-key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_with_conversion() {
        let (_, cache) = new_cache();
        let key = cache.store("ab".into()).await.unwrap();

        let length = cache
            .get_with(&key, |raw| Ok(raw.len()))
            .await
            .unwrap();
        assert_eq!(length, Some(2));

        // conversion must not run for an absent key
        let ret = cache
            .get_with("no-such-key", |_| -> Result<usize, CacheError> {
                panic!("conversion invoked for absent key")
            })
            .await
            .unwrap();
        assert_eq!(ret, None);
    }

    #[tokio::test]
    async fn test_replay_lists_calls_in_order() {
        let (store, cache) = new_cache();
        let key_a = cache.store("a".into()).await.unwrap();
        let key_b = cache.store("b".into()).await.unwrap();

        let text = replay(&store, Cache::STORE_METHOD).await.unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Cache::store was called 2 times:"));
        assert_eq!(
            lines.next(),
            Some(format!("Cache::store(*(\"a\",)) -> {}", key_a).as_str())
        );
        assert_eq!(
            lines.next(),
            Some(format!("Cache::store(*(\"b\",)) -> {}", key_b).as_str())
        );
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn test_replay_unknown_method_is_not_found() {
        let (store, _) = new_cache();
        let err = replay(&store, Cache::GET_INT_METHOD).await.unwrap_err();
        assert!(matches!(err, CacheError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_flush_then_replay_is_not_found() {
        let (store, cache) = new_cache();
        cache.store("a".into()).await.unwrap();
        assert!(replay(&store, Cache::STORE_METHOD).await.is_ok());

        cache.flush().await.unwrap();
        let err = replay(&store, Cache::STORE_METHOD).await.unwrap_err();
        assert!(matches!(err, CacheError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_failed_call_still_counts() {
        let (store, cache) = new_cache();
        let key = cache.store("not a number".into()).await.unwrap();
        assert!(cache.get_int(&key).await.is_err());

        // the counter reflects attempts, the output list only completions
        let count = store.get(Cache::GET_INT_METHOD).await.unwrap();
        assert_eq!(count, Some(b"1".to_vec()));
        let outputs_key = format!("{}:outputs", Cache::GET_INT_METHOD);
        let outputs = store.lrange(&outputs_key, 0, -1).await.unwrap();
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn test_composition_order_keeps_invariant() {
        use crate::cache::{CallCounter, HistoryRecorder, Instrument, InstrumentedMethod};

        let store: Arc<dyn Store + Send + Sync> = Arc::new(InMemStore::new());
        // history before counter, the reverse of the standard chain
        let layers: Vec<Arc<dyn Instrument>> = vec![
            Arc::new(HistoryRecorder::new(store.clone(), "Cache::custom")),
            Arc::new(CallCounter::new(store.clone(), "Cache::custom")),
        ];
        let method = InstrumentedMethod::with_layers(layers);

        method.enter("(\"x\",)").await.unwrap();
        method.exit("ok").await.unwrap();

        assert_eq!(
            store.get("Cache::custom").await.unwrap(),
            Some(b"1".to_vec())
        );
        let inputs = store.lrange("Cache::custom:inputs", 0, -1).await.unwrap();
        let outputs = store.lrange("Cache::custom:outputs", 0, -1).await.unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn test_value_repr_forms() {
        assert_eq!(Value::Str("foo".to_string()).repr(), "\"foo\"");
        assert_eq!(Value::Int(42).repr(), "42");
        assert_eq!(Value::Float(3.5).repr(), "3.5");
        assert_eq!(Value::Bytes(vec![0x41, 0x00]).repr(), "b\"A\\x00\"");
    }

    #[test]
    fn test_value_display_is_unquoted() {
        assert_eq!(Value::Str("foo".to_string()).to_string(), "foo");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Bytes(vec![0x41, 0x00]).to_string(), "b\"A\\x00\"");
    }

    #[test]
    fn test_error_codes() {
        let err = CacheError::Connection {
            message: "down".to_string(),
        };
        assert_eq!(err.error_code(), "CONNECTION_ERROR");
        let err = CacheError::Conversion {
            message: "bad".to_string(),
        };
        assert_eq!(err.error_code(), "CONVERSION_ERROR");
        let err = CacheError::NotFound {
            method: "Cache::store".to_string(),
        };
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_conversion_error_code_surfaces() {
        let (_, cache) = new_cache();
        let key = cache.store("foo".into()).await.unwrap();
        let err = cache.get_int(&key).await.unwrap_err();
        assert_eq!(err.error_code(), "CONVERSION_ERROR");
    }
}
