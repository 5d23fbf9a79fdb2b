//! Integration tests for the engine running on externally implemented contracts

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::RwLock;

    use cc_core::domain::{EffectiveCode, PeriodLimit, SendOutcome, VerifyOutcome};
    use cc_core::errors::StorageError;
    use cc_core::services::{CodeEngine, CodeSender, CodeStorage};

    // Sender that only accepts receivers in E.164 form
    struct PlusOnlySender {
        delivered: RwLock<Vec<(String, String)>>,
    }

    impl PlusOnlySender {
        fn new() -> Self {
            Self {
                delivered: RwLock::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CodeSender for PlusOnlySender {
        fn identity(&self) -> &str {
            "plus"
        }

        fn supports_receiver(&self, receiver: &str) -> bool {
            receiver.starts_with('+') && receiver.len() >= 10
        }

        async fn send(&self, receiver: &str, _business: &str, code: &str, _ttl: Duration) -> bool {
            self.delivered
                .write()
                .await
                .push((receiver.to_string(), code.to_string()));
            true
        }
    }

    // Storage without expiry, enough to exercise the engine through the public contract
    #[derive(Default)]
    struct TableStorage {
        codes: RwLock<HashMap<String, (String, u32, DateTime<Utc>)>>,
        quotas: RwLock<HashMap<String, u32>>,
    }

    fn key(receiver: &str, business: &str) -> String {
        format!("{}|{}", business, receiver)
    }

    #[async_trait]
    impl CodeStorage for TableStorage {
        async fn set_code(
            &self,
            receiver: &str,
            business: &str,
            code: &str,
            _ttl: Duration,
        ) -> Result<bool, StorageError> {
            self.codes
                .write()
                .await
                .insert(key(receiver, business), (code.to_string(), 0, Utc::now()));
            Ok(true)
        }

        async fn increase_errors(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
            if let Some(entry) = self.codes.write().await.get_mut(&key(receiver, business)) {
                entry.1 += 1;
            }
            Ok(())
        }

        async fn get_effective_code(
            &self,
            receiver: &str,
            business: &str,
        ) -> Result<Option<EffectiveCode>, StorageError> {
            Ok(self
                .codes
                .read()
                .await
                .get(&key(receiver, business))
                .map(|(code, errors, _)| EffectiveCode {
                    code: code.clone(),
                    error_count: *errors,
                }))
        }

        async fn set_quota_window(
            &self,
            receiver: &str,
            business: &str,
            _window: Option<Duration>,
        ) -> Result<bool, StorageError> {
            self.quotas.write().await.insert(key(receiver, business), 1);
            Ok(true)
        }

        async fn increase_sent_count(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
            if let Some(count) = self.quotas.write().await.get_mut(&key(receiver, business)) {
                *count += 1;
            }
            Ok(())
        }

        async fn get_sent_count(&self, receiver: &str, business: &str) -> Result<u32, StorageError> {
            Ok(self
                .quotas
                .read()
                .await
                .get(&key(receiver, business))
                .copied()
                .unwrap_or(0))
        }

        async fn get_last_issued_at(
            &self,
            receiver: &str,
            business: &str,
        ) -> Result<Option<DateTime<Utc>>, StorageError> {
            Ok(self
                .codes
                .read()
                .await
                .get(&key(receiver, business))
                .map(|(_, _, issued_at)| *issued_at))
        }

        async fn clear_session(&self, receiver: &str, business: &str) -> Result<(), StorageError> {
            let session = key(receiver, business);
            self.codes.write().await.remove(&session);
            self.quotas.write().await.remove(&session);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_engine_on_custom_backend() {
        let sender = Arc::new(PlusOnlySender::new());
        let engine = CodeEngine::new(sender.clone(), Arc::new(TableStorage::default()));
        let ttl = Duration::from_secs(300);

        assert_eq!(
            engine.issue_code("13800138000", "login", "123456", ttl, None).await,
            SendOutcome::NotSupported
        );
        assert_eq!(
            engine.issue_code("+14155552671", "login", "123456", ttl, None).await,
            SendOutcome::Success
        );
        assert_eq!(sender.delivered.read().await.len(), 1);

        assert_eq!(
            engine
                .verify_code("+14155552671", "login", "000000", 2, true)
                .await
                .unwrap(),
            VerifyOutcome::Failed
        );
        assert_eq!(
            engine
                .verify_code("+14155552671", "login", "123456", 2, true)
                .await
                .unwrap(),
            VerifyOutcome::Success
        );
        assert_eq!(
            engine
                .verify_code("+14155552671", "login", "123456", 2, true)
                .await
                .unwrap(),
            VerifyOutcome::Expired
        );
    }

    #[tokio::test]
    async fn test_lifetime_cap_on_custom_backend() {
        let engine = CodeEngine::new(
            Arc::new(PlusOnlySender::new()),
            Arc::new(TableStorage::default()),
        );
        let limit = PeriodLimit::new(2);
        let ttl = Duration::from_secs(60);

        for _ in 0..2 {
            assert_eq!(
                engine
                    .issue_code("+8613800138000", "bind", "4242", ttl, Some(&limit))
                    .await,
                SendOutcome::Success
            );
        }
        assert_eq!(
            engine
                .issue_code("+8613800138000", "bind", "4242", ttl, Some(&limit))
                .await,
            SendOutcome::MaxSendLimit
        );
    }
}
