use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    /// Interactions handled, keyed by widget (`upload`, `image`, `chat`, `redraw`).
    pub interactions: HashMap<String, u64>,
    /// Interactions that rendered an error or warning, keyed the same way.
    pub failures: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    pub async fn record(&self, kind: &str, failed: bool) {
        let mut data = self.inner.write().await;
        *data.interactions.entry(kind.to_string()).or_insert(0) += 1;
        if failed {
            *data.failures.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failures_are_counted_separately() {
        let metrics = MetricsManager::new();
        metrics.record("chat", false).await;
        metrics.record("chat", true).await;
        metrics.record("image", false).await;

        let data = metrics.get_metrics().await;
        assert_eq!(data.interactions.get("chat"), Some(&2));
        assert_eq!(data.interactions.get("image"), Some(&1));
        assert_eq!(data.failures.get("chat"), Some(&1));
        assert_eq!(data.failures.get("image"), None);
    }
}
