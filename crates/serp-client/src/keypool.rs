use analysis_core::AnalysisError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Upstream call categories, each with its own optional credential pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Forecast,
    Topics,
    Queries,
    News,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Forecast,
        Service::Topics,
        Service::Queries,
        Service::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Forecast => "forecast",
            Service::Topics => "topics",
            Service::Queries => "queries",
            Service::News => "news",
        }
    }

    fn env_var(&self) -> &'static str {
        match self {
            Service::Forecast => "SERP_API_KEYS_FORECAST",
            Service::Topics => "SERP_API_KEYS_TOPICS",
            Service::Queries => "SERP_API_KEYS_QUERIES",
            Service::News => "SERP_API_KEYS_NEWS",
        }
    }
}

/// One ordered key list with an atomic round-robin cursor. The cursor only
/// ever advances, so concurrent draws interleave but never corrupt it.
#[derive(Debug, Default)]
struct Pool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl Pool {
    fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Some(&self.keys[i])
    }

    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Credential pools for the search upstream: one optional pool per service
/// plus a shared fallback pool. Constructed once from the environment and
/// owned by the orchestrator; rotation state lives here, not in a global.
#[derive(Debug)]
pub struct KeyPools {
    forecast: Pool,
    topics: Pool,
    queries: Pool,
    news: Pool,
    shared: Pool,
}

impl KeyPools {
    /// Build pools from `SERP_API_KEYS` (shared, comma-separated) and the
    /// optional `SERP_API_KEYS_<SERVICE>` overrides. Fails fast when no key
    /// exists anywhere — that is a configuration error, not a fetch error.
    pub fn from_env() -> Result<Self, AnalysisError> {
        dotenvy::dotenv().ok();

        let read = |var: &str| -> Vec<String> {
            std::env::var(var).map(|v| parse_keys(&v)).unwrap_or_default()
        };

        let pools = Self {
            forecast: Pool::new(read(Service::Forecast.env_var())),
            topics: Pool::new(read(Service::Topics.env_var())),
            queries: Pool::new(read(Service::Queries.env_var())),
            news: Pool::new(read(Service::News.env_var())),
            shared: Pool::new(read("SERP_API_KEYS")),
        };

        if pools.is_empty() {
            return Err(AnalysisError::Configuration(
                "SERP_API_KEYS environment variable not found. Please set it.".to_string(),
            ));
        }
        Ok(pools)
    }

    /// Direct constructor with a shared pool only (service pools empty).
    pub fn from_shared(shared: Vec<String>) -> Self {
        Self {
            forecast: Pool::default(),
            topics: Pool::default(),
            queries: Pool::default(),
            news: Pool::default(),
            shared: Pool::new(shared),
        }
    }

    /// Replace one service-specific pool.
    pub fn set_service_keys(&mut self, service: Service, keys: Vec<String>) {
        *self.pool_mut(service) = Pool::new(keys);
    }

    fn pool(&self, service: Service) -> &Pool {
        match service {
            Service::Forecast => &self.forecast,
            Service::Topics => &self.topics,
            Service::Queries => &self.queries,
            Service::News => &self.news,
        }
    }

    fn pool_mut(&mut self, service: Service) -> &mut Pool {
        match service {
            Service::Forecast => &mut self.forecast,
            Service::Topics => &mut self.topics,
            Service::Queries => &mut self.queries,
            Service::News => &mut self.news,
        }
    }

    fn is_empty(&self) -> bool {
        Service::ALL.iter().all(|s| self.pool(*s).is_empty()) && self.shared.is_empty()
    }

    /// Round-robin draw for one service; falls back to the shared pool when
    /// the service pool is empty. `None` means the caller must fail that one
    /// branch closed.
    pub fn next_key(&self, service: Service) -> Option<String> {
        if let Some(key) = self.pool(service).next() {
            return Some(key.to_string());
        }
        tracing::debug!(service = service.as_str(), "service pool empty, using shared pool");
        self.shared.next().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_round_robin_cycles_deterministically() {
        let mut pools = KeyPools::from_shared(vec![]);
        pools.set_service_keys(
            Service::Topics,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );

        let draws: Vec<String> = (0..6)
            .map(|_| pools.next_key(Service::Topics).unwrap())
            .collect();
        assert_eq!(draws, vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_missing_service_pool_falls_back_to_shared() {
        let pools = KeyPools::from_shared(vec!["shared-key".to_string()]);
        assert_eq!(pools.next_key(Service::News).as_deref(), Some("shared-key"));
    }

    #[test]
    fn test_no_keys_anywhere_fails_closed() {
        let pools = KeyPools::from_shared(vec![]);
        assert_eq!(pools.next_key(Service::Forecast), None);
    }

    #[test]
    fn test_service_pool_is_preferred_over_shared() {
        let mut pools = KeyPools::from_shared(vec!["shared-key".to_string()]);
        pools.set_service_keys(Service::News, vec!["news-key".to_string()]);
        assert_eq!(pools.next_key(Service::News).as_deref(), Some("news-key"));
    }

    #[test]
    fn test_concurrent_draws_do_not_corrupt_rotation() {
        let pools = Arc::new(KeyPools::from_shared(vec![
            "k1".to_string(),
            "k2".to_string(),
            "k3".to_string(),
        ]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pools = Arc::clone(&pools);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        assert!(pools.next_key(Service::Queries).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // 8 * 250 = 2000 draws consumed; the next three draws still cycle.
        let a = pools.next_key(Service::Queries).unwrap();
        let b = pools.next_key(Service::Queries).unwrap();
        let c = pools.next_key(Service::Queries).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_parse_keys_trims_and_drops_empty() {
        assert_eq!(parse_keys(" a , b ,, c "), vec!["a", "b", "c"]);
        assert!(parse_keys("").is_empty());
    }
}
