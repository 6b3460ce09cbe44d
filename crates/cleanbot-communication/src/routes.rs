//! Named route persistence.

use cleanbot_core::constants::{DEFAULT_ROUTES_NAMESPACE, DEFAULT_STORE_ROOT};
use cleanbot_core::{Error, Result, RouteError};
use cleanbot_designer::RouteRecord;
use serde_json::Value;
use std::sync::Arc;

use crate::store::RealtimeStore;

const FORBIDDEN_NAME_CHARS: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// Checks that `name` can be used as a single store key.
pub fn validate_route_name(name: &str) -> std::result::Result<(), RouteError> {
    if name.trim().is_empty() {
        return Err(RouteError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(RouteError::InvalidName {
            name: name.to_string(),
            reason: format!("'{}' is not allowed", c),
        });
    }
    Ok(())
}

/// Saves and loads route records under `<root>/<namespace>/<name>`.
pub struct RouteRepository {
    store: Arc<dyn RealtimeStore>,
    base: String,
}

impl RouteRepository {
    pub fn new(store: Arc<dyn RealtimeStore>, root: &str, namespace: &str) -> Self {
        Self {
            store,
            base: format!("{}/{}", root, namespace),
        }
    }

    /// Repository under `esp32_cleaning_bot/saved_routes`.
    pub fn with_defaults(store: Arc<dyn RealtimeStore>) -> Self {
        Self::new(store, DEFAULT_STORE_ROOT, DEFAULT_ROUTES_NAMESPACE)
    }

    fn path_for(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }

    /// Writes `record` under `name`, replacing any previous route.
    pub async fn save(&self, name: &str, record: &RouteRecord) -> Result<()> {
        validate_route_name(name)?;
        if record.is_empty() {
            return Err(RouteError::Empty.into());
        }
        let value = serde_json::to_value(record)?;
        self.store.set(&self.path_for(name), value).await?;
        tracing::info!("Saved route '{}' ({} segments)", name, record.segments.len());
        Ok(())
    }

    /// Reads the route stored under `name`.
    ///
    /// Missing collections default to empty; a value that is not a record
    /// at all is reported as malformed.
    pub async fn load(&self, name: &str) -> Result<RouteRecord> {
        validate_route_name(name)?;
        let value = self
            .store
            .get(&self.path_for(name))
            .await?
            .ok_or_else(|| RouteError::NotFound {
                name: name.to_string(),
            })?;

        if !value.is_object() {
            return Err(Error::Route(RouteError::Malformed {
                name: name.to_string(),
                reason: "expected an object".to_string(),
            }));
        }

        let record: RouteRecord =
            serde_json::from_value(value).map_err(|e| RouteError::Malformed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        tracing::info!("Loaded route '{}' ({} segments)", name, record.segments.len());
        Ok(record)
    }

    /// Names of all saved routes, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = match self.store.get(&self.base).await? {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use cleanbot_core::{Point, Segment};
    use cleanbot_designer::RouteStats;
    use serde_json::json;

    fn record() -> RouteRecord {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        RouteRecord::new(vec![segment], vec![segment.p1, segment.p2], RouteStats::default())
    }

    #[test]
    fn test_validate_route_name() {
        assert!(validate_route_name("default_route").is_ok());
        assert!(validate_route_name("living room 2").is_ok());
        assert!(validate_route_name("").is_err());
        assert!(validate_route_name("   ").is_err());
        for bad in ["a/b", "a.b", "a#b", "a$b", "a[b", "a]b"] {
            assert!(validate_route_name(bad).is_err(), "{}", bad);
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = Arc::new(MemoryStore::new());
        let repo = RouteRepository::with_defaults(store.clone());

        repo.save("kitchen", &record()).await.unwrap();
        let loaded = repo.load("kitchen").await.unwrap();
        assert_eq!(loaded, record_with_time(loaded.saved_at_epoch_ms));

        assert!(store
            .snapshot()
            .pointer("/esp32_cleaning_bot/saved_routes/kitchen/segments")
            .is_some());
    }

    fn record_with_time(saved_at_epoch_ms: i64) -> RouteRecord {
        RouteRecord {
            saved_at_epoch_ms,
            ..record()
        }
    }

    #[tokio::test]
    async fn test_load_missing_route() {
        let repo = RouteRepository::with_defaults(Arc::new(MemoryStore::new()));
        let err = repo.load("nowhere").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_route_is_not_saved() {
        let repo = RouteRepository::with_defaults(Arc::new(MemoryStore::new()));
        let err = repo.save("x", &RouteRecord::default()).await.unwrap_err();
        assert!(err.is_empty_route());
    }

    #[tokio::test]
    async fn test_malformed_records() {
        let store = Arc::new(MemoryStore::new());
        let repo = RouteRepository::new(store.clone(), "bot", "routes");

        store.set("bot/routes/partial", json!({"saved_at_epoch_ms": 1})).await.unwrap();
        let partial = repo.load("partial").await.unwrap();
        assert!(partial.segments.is_empty());
        assert!(partial.waypoints.is_empty());

        store.set("bot/routes/scalar", json!("oops")).await.unwrap();
        assert!(matches!(
            repo.load("scalar").await,
            Err(Error::Route(RouteError::Malformed { .. }))
        ));

        store.set("bot/routes/typo", json!({"segments": 3})).await.unwrap();
        assert!(matches!(
            repo.load("typo").await,
            Err(Error::Route(RouteError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_routes() {
        let repo = RouteRepository::with_defaults(Arc::new(MemoryStore::new()));
        assert!(repo.list().await.unwrap().is_empty());

        repo.save("zeta", &record()).await.unwrap();
        repo.save("alpha", &record()).await.unwrap();
        assert_eq!(repo.list().await.unwrap(), vec!["alpha", "zeta"]);
    }
}
