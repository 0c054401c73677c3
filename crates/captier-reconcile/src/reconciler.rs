//! Create-or-update reconciliation of the config artifact.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use captier_core::{CapacityResult, ConfigArtifact, ConfigStore};

/// What the reconciler did for one artifact identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Artifact did not exist and was created.
    Created,
    /// Artifact did not exist; creation was skipped by configuration.
    SkippedCreation,
    /// Artifact existed and its payload was replaced.
    Updated,
}

/// Ensures the store's artifact for an identity holds exactly the given
/// payload.
pub struct Reconciler {
    store: Arc<dyn ConfigStore>,
    /// Report intended creations instead of performing them.
    skip_creation: bool,
}

impl Reconciler {
    /// Create a reconciler over the given store.
    pub fn new(store: Arc<dyn ConfigStore>, skip_creation: bool) -> Self {
        Self {
            store,
            skip_creation,
        }
    }

    /// Reconcile one artifact identity to the given payload.
    ///
    /// The payload replaces whatever the artifact held before; nothing is
    /// merged. Last writer wins. Reconciling an unchanged payload is a
    /// harmless no-op update.
    pub async fn reconcile(
        &self,
        namespace: &str,
        name: &str,
        data: HashMap<String, String>,
    ) -> CapacityResult<ReconcileOutcome> {
        let existing = self.store.get(namespace, name).await?;
        let artifact = ConfigArtifact::new(namespace, name, data);

        match existing {
            None if self.skip_creation => {
                warn!(
                    namespace,
                    name, "artifact missing, creation skipped by configuration"
                );
                Ok(ReconcileOutcome::SkippedCreation)
            }
            None => {
                self.store.create(&artifact).await?;
                info!(namespace, name, "created artifact");
                Ok(ReconcileOutcome::Created)
            }
            Some(_) => {
                self.store.update(&artifact).await?;
                info!(namespace, name, "updated artifact");
                Ok(ReconcileOutcome::Updated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use captier_core::CapacityError;
    use std::sync::Mutex;

    /// Store fake recording artifacts and call counts.
    #[derive(Default)]
    struct RecordingStore {
        artifacts: Mutex<HashMap<(String, String), ConfigArtifact>>,
        fail_writes: bool,
        updates: Mutex<u32>,
    }

    impl RecordingStore {
        fn seeded(namespace: &str, name: &str, data: HashMap<String, String>) -> Self {
            let store = Self::default();
            store.artifacts.lock().unwrap().insert(
                (namespace.to_string(), name.to_string()),
                ConfigArtifact::new(namespace, name, data),
            );
            store
        }

        fn stored(&self, namespace: &str, name: &str) -> Option<ConfigArtifact> {
            self.artifacts
                .lock()
                .unwrap()
                .get(&(namespace.to_string(), name.to_string()))
                .cloned()
        }
    }

    #[async_trait]
    impl ConfigStore for RecordingStore {
        async fn get(
            &self,
            namespace: &str,
            name: &str,
        ) -> CapacityResult<Option<ConfigArtifact>> {
            Ok(self.stored(namespace, name))
        }

        async fn create(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
            if self.fail_writes {
                return Err(CapacityError::StoreWriteFailed {
                    namespace: artifact.namespace.clone(),
                    name: artifact.name.clone(),
                    reason: "forbidden".to_string(),
                });
            }
            self.artifacts.lock().unwrap().insert(
                (artifact.namespace.clone(), artifact.name.clone()),
                artifact.clone(),
            );
            Ok(())
        }

        async fn update(&self, artifact: &ConfigArtifact) -> CapacityResult<()> {
            if self.fail_writes {
                return Err(CapacityError::StoreWriteFailed {
                    namespace: artifact.namespace.clone(),
                    name: artifact.name.clone(),
                    reason: "forbidden".to_string(),
                });
            }
            *self.updates.lock().unwrap() += 1;
            self.artifacts.lock().unwrap().insert(
                (artifact.namespace.clone(), artifact.name.clone()),
                artifact.clone(),
            );
            Ok(())
        }
    }

    fn payload(text: &str) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("priorities".to_string(), text.to_string());
        data
    }

    #[tokio::test]
    async fn creates_when_absent() {
        let store = Arc::new(RecordingStore::default());
        let reconciler = Reconciler::new(store.clone(), false);

        let outcome = reconciler
            .reconcile("kube-system", "expander", payload("5:\n  - a\n"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Created);
        let stored = store.stored("kube-system", "expander").unwrap();
        assert_eq!(stored.data.get("priorities").unwrap(), "5:\n  - a\n");
    }

    #[tokio::test]
    async fn skips_creation_when_configured() {
        let store = Arc::new(RecordingStore::default());
        let reconciler = Reconciler::new(store.clone(), true);

        let outcome = reconciler
            .reconcile("kube-system", "expander", payload("5:\n  - a\n"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::SkippedCreation);
        assert!(store.stored("kube-system", "expander").is_none());
    }

    #[tokio::test]
    async fn replaces_payload_in_full_when_found() {
        let mut stale = payload("9:\n  - old\n");
        stale.insert("leftover".to_string(), "junk".to_string());
        let store = Arc::new(RecordingStore::seeded("kube-system", "expander", stale));
        let reconciler = Reconciler::new(store.clone(), false);

        let outcome = reconciler
            .reconcile("kube-system", "expander", payload("7:\n  - new\n"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated);
        let stored = store.stored("kube-system", "expander").unwrap();
        // Replaced, not merged: the stray key is gone.
        assert_eq!(stored.data.len(), 1);
        assert_eq!(stored.data.get("priorities").unwrap(), "7:\n  - new\n");
    }

    #[tokio::test]
    async fn reconciling_an_unchanged_payload_is_idempotent() {
        let store = Arc::new(RecordingStore::default());
        let reconciler = Reconciler::new(store.clone(), false);

        reconciler
            .reconcile("ns", "expander", payload("3:\n  - a\n"))
            .await
            .unwrap();
        let first = store.stored("ns", "expander").unwrap();

        let outcome = reconciler
            .reconcile("ns", "expander", payload("3:\n  - a\n"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Updated);
        assert_eq!(store.stored("ns", "expander").unwrap(), first);
        assert_eq!(*store.updates.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn write_failures_surface_without_partial_state() {
        let store = Arc::new(RecordingStore {
            fail_writes: true,
            ..RecordingStore::default()
        });
        let reconciler = Reconciler::new(store.clone(), false);

        let err = reconciler
            .reconcile("ns", "expander", payload("3:\n  - a\n"))
            .await
            .unwrap_err();

        assert!(matches!(err, CapacityError::StoreWriteFailed { .. }));
        assert!(store.stored("ns", "expander").is_none());
    }
}
