//! Tests for the key/value transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{KvError, KvPublisher, KvReader, KvStore, RedisStore, StatePublisher, StateReader, TransportError};
use crate::lookup::IpInfo;
use crate::state::{StateHandle, Status};

/// In-memory store recording every write.
#[derive(Debug, Default)]
struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl KvStore for MemoryStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

/// Store that is always unreachable.
#[derive(Debug)]
struct DownStore;

impl KvStore for DownStore {
    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }

    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Err(KvError::Backend("connection refused".to_string()))
    }
}

fn info(ip: &str) -> IpInfo {
    IpInfo {
        ip: ip.to_string(),
        asn: "AS54321".to_string(),
        as_name: "Demo ISP".to_string(),
        as_domain: "demo.isp".to_string(),
        country_code: "DE".to_string(),
        country: "Germany".to_string(),
        continent_code: "EU".to_string(),
        continent: "Europe".to_string(),
    }
}

/// Polls `check` until it holds or a second passes.
async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

mod publisher {
    use super::*;

    #[tokio::test]
    async fn publishes_initial_state_then_changes() {
        let store = Arc::new(MemoryStore::default());
        let state = StateHandle::new();
        let publisher = KvPublisher::shared(Arc::clone(&store), "external_ip_info");
        let reader = KvReader::shared(Arc::clone(&store), "external_ip_info");
        let task = tokio::spawn(publisher.serve(state.clone()));

        assert!(eventually(|| store.writes.load(Ordering::SeqCst) >= 1).await);
        let initial = reader.read().await.unwrap();
        assert_eq!(initial.status, Status::Updating);
        assert!(initial.info.is_none());

        state.complete(info("198.51.100.7"));
        assert!(
            eventually(|| {
                store
                    .values
                    .lock()
                    .unwrap()
                    .get("external_ip_info")
                    .is_some_and(|v| String::from_utf8_lossy(v).contains("198.51.100.7"))
            })
            .await
        );
        let ready = reader.read().await.unwrap();
        assert_eq!(ready.status, Status::Ready);

        task.abort();
    }

    #[tokio::test]
    async fn store_failure_does_not_stop_publisher() {
        let state = StateHandle::new();
        let task = tokio::spawn(KvPublisher::new(DownStore, "k").serve(state.clone()));

        state.complete(info("198.51.100.7"));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!task.is_finished());
        task.abort();
    }

    #[tokio::test]
    async fn publish_reports_store_error() {
        let publisher = KvPublisher::new(DownStore, "k");

        let error = publisher
            .publish(&crate::state::ServiceState::new())
            .await
            .unwrap_err();

        assert!(matches!(error, TransportError::Kv(KvError::Backend(_))));
        assert_eq!(publisher.key(), "k");
    }
}

mod reader {
    use super::*;

    #[tokio::test]
    async fn absent_key_is_not_published() {
        let reader = KvReader::new(MemoryStore::default(), "external_ip_info");

        let error = reader.read().await.unwrap_err();

        assert!(matches!(error, TransportError::NotPublished { ref key } if key == "external_ip_info"));
    }

    #[tokio::test]
    async fn invalid_value_is_codec_error() {
        let store = MemoryStore::default();
        store.set("k", b"{\"ip\": \"1.2.3.4\"}").unwrap();
        let reader = KvReader::new(store, "k");

        let error = reader.read().await.unwrap_err();

        assert!(matches!(error, TransportError::Codec(_)));
    }

    #[tokio::test]
    async fn unreachable_store_is_kv_error() {
        let reader = KvReader::new(DownStore, "k");

        let error = reader.read().await.unwrap_err();

        assert!(matches!(error, TransportError::Kv(_)));
    }
}

mod redis_store {
    use super::*;

    #[test]
    fn open_accepts_redis_url() {
        let store = RedisStore::open("redis://127.0.0.1:6379/0").unwrap();
        let _ = format!("{store:?}");
    }

    #[test]
    fn open_rejects_foreign_scheme() {
        assert!(RedisStore::open("http://127.0.0.1/").is_err());
    }

    #[test]
    fn with_timeout_overrides_default() {
        let store = RedisStore::open("redis://127.0.0.1/")
            .unwrap()
            .with_timeout(Duration::from_millis(250));
        let _ = format!("{store:?}");
    }
}
