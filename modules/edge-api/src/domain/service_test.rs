#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{error, service, store};
    use crate::infra::store::InMemoryStateStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    // Store that records calls and can be told to fail on either operation
    #[derive(Default)]
    struct MockStore {
        value: Mutex<Option<String>>,
        calls: Mutex<Vec<String>>,
        fail_get: bool,
        fail_set: bool,
    }

    #[async_trait]
    impl store::StateStore for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>, store::StoreError> {
            self.calls.lock().push(format!("get {key}"));
            if self.fail_get {
                return Err(store::StoreError::Status {
                    status: 503,
                    message: "unavailable".to_owned(),
                });
            }
            Ok(self.value.lock().clone())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), store::StoreError> {
            self.calls.lock().push(format!("set {key}={value}"));
            if self.fail_set {
                return Err(store::StoreError::Malformed("no result".to_owned()));
            }
            *self.value.lock() = Some(value.to_owned());
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "mock"
        }
    }

    fn memory_service() -> service::StateService {
        service::StateService::new(Arc::new(InMemoryStateStore::new()))
    }

    #[tokio::test]
    async fn read_before_any_write_is_none() {
        let service = memory_service();
        assert_eq!(service.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn first_write_reports_no_previous_value() {
        let service = memory_service();
        let transition = service.write("42".to_owned()).await.unwrap();
        assert_eq!(transition.previous, None);
        assert_eq!(transition.current, "42");
    }

    #[tokio::test]
    async fn second_write_reports_first_value() {
        let service = memory_service();
        service.write("v1".to_owned()).await.unwrap();
        let transition = service.write("v2".to_owned()).await.unwrap();

        assert_eq!(transition.previous.as_deref(), Some("v1"));
        assert_eq!(transition.current, "v2");
        assert_eq!(service.read().await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn write_reads_then_writes_the_state_key() {
        let store = Arc::new(MockStore::default());
        let service = service::StateService::new(store.clone());

        service.write("hello".to_owned()).await.unwrap();

        assert_eq!(
            *store.calls.lock(),
            vec![
                "get stateValue".to_owned(),
                "set stateValue=hello".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn failed_read_aborts_write() {
        let store = Arc::new(MockStore {
            fail_get: true,
            ..MockStore::default()
        });
        let service = service::StateService::new(store.clone());

        let err = service.write("lost".to_owned()).await.unwrap_err();

        assert!(matches!(err, error::DomainError::Store(_)));
        assert_eq!(store.calls.lock().len(), 1, "set must not be attempted");
    }

    #[tokio::test]
    async fn failed_write_is_reported() {
        let store = Arc::new(MockStore {
            fail_set: true,
            ..MockStore::default()
        });
        let service = service::StateService::new(store);

        let err = service.write("x".to_owned()).await.unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::Store(store::StoreError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn failed_read_is_reported() {
        let store = Arc::new(MockStore {
            fail_get: true,
            ..MockStore::default()
        });
        let service = service::StateService::new(store);

        let err = service.read().await.unwrap_err();
        assert!(matches!(
            err,
            error::DomainError::Store(store::StoreError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn exposes_backend_name() {
        let service = service::StateService::new(Arc::new(MockStore::default()));
        assert_eq!(service.backend(), "mock");
    }
}
