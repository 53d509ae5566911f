//! Cached balance queries using Moka.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use ohada_shared::{AppConfig, CacheSettings};
use rust_decimal::Decimal;
use tracing::debug;

use super::source::BalanceSource;
use super::types::{BalanceData, BalanceQuery};
use crate::balance::{BalanceError, BalanceService, EquilibriumPolicy};

/// Balance query front: fetches from a source and caches results per query.
///
/// Failed fetches are not cached.
pub struct BalanceQueryService<S> {
    source: S,
    cache: Cache<BalanceQuery, Arc<BalanceData>>,
    policy: EquilibriumPolicy,
}

impl<S: BalanceSource> BalanceQueryService<S> {
    /// Creates a service with explicit cache settings and tolerance.
    #[must_use]
    pub fn new(source: S, cache: &CacheSettings, tolerance: Decimal) -> Self {
        let cache = Cache::builder()
            .max_capacity(cache.max_capacity)
            .time_to_live(Duration::from_secs(cache.ttl_secs))
            .build();

        Self {
            source,
            cache,
            policy: EquilibriumPolicy::Tolerance(tolerance),
        }
    }

    /// Creates a service from the application configuration.
    #[must_use]
    pub fn from_config(source: S, config: &AppConfig) -> Self {
        Self::new(source, &config.cache, config.ledger.balance_tolerance)
    }

    /// Runs a query, returning a cached result when available.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::InvalidDateRange` if `date_from > date_to`, or
    /// whatever the source fails with.
    pub fn query(&self, query: &BalanceQuery) -> Result<BalanceData, BalanceError> {
        if query.date_from > query.date_to {
            return Err(BalanceError::InvalidDateRange {
                start: query.date_from,
                end: query.date_to,
            });
        }

        if let Some(hit) = self.cache.get(query) {
            debug!(from = %query.date_from, to = %query.date_to, "Balance cache hit");
            let mut data = (*hit).clone();
            data.cached = true;
            return Ok(data);
        }

        let accounts = self.source.fetch(query)?;
        let totals = BalanceService::calculate_totals(&accounts);
        let equilibrium = BalanceService::equilibrium(&totals, self.policy);
        let data = BalanceData {
            accounts,
            totals,
            equilibrium,
            cached: false,
        };

        debug!(
            from = %query.date_from,
            to = %query.date_to,
            balanced = equilibrium.is_balanced,
            "Balance computed"
        );
        self.cache.insert(query.clone(), Arc::new(data.clone()));
        Ok(data)
    }

    /// Drops the cached result of one query.
    pub fn invalidate(&self, query: &BalanceQuery) {
        self.cache.invalidate(query);
    }

    /// Drops every cached result.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached results.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending cache maintenance.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceAccount;
    use crate::query::source::StaticBalanceSource;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: StaticBalanceSource,
        calls: Arc<AtomicUsize>,
    }

    impl BalanceSource for CountingSource {
        fn fetch(&self, query: &BalanceQuery) -> Result<Vec<BalanceAccount>, BalanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(query)
        }
    }

    struct FailingSource;

    impl BalanceSource for FailingSource {
        fn fetch(&self, _query: &BalanceQuery) -> Result<Vec<BalanceAccount>, BalanceError> {
            Err(BalanceError::Source("connexion refusée".to_string()))
        }
    }

    fn forest(gap: Decimal) -> Vec<BalanceAccount> {
        vec![
            BalanceAccount::new("521000", "Banque", 1).with_closing(dec!(1000) + gap, dec!(0)),
            BalanceAccount::new("101000", "Capital", 1).with_closing(dec!(0), dec!(1000)),
        ]
    }

    fn query() -> BalanceQuery {
        BalanceQuery::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
    }

    fn query_service(gap: Decimal) -> (BalanceQueryService<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            inner: StaticBalanceSource::new(forest(gap)),
            calls: Arc::clone(&calls),
        };
        (
            BalanceQueryService::from_config(source, &AppConfig::default()),
            calls,
        )
    }

    #[test]
    fn test_second_query_is_cached() {
        let (service, calls) = query_service(dec!(0));

        let first = service.query(&query()).unwrap();
        assert!(!first.cached);
        assert!(first.equilibrium.is_balanced);

        let second = service.query(&query()).unwrap();
        assert!(second.cached);
        assert_eq!(second.totals, first.totals);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // another key misses
        service.query(&query().including_zero()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate() {
        let (service, calls) = query_service(dec!(0));
        service.query(&query()).unwrap();

        service.invalidate(&query());
        assert!(!service.query(&query()).unwrap().cached);

        service.invalidate_all();
        assert!(!service.query(&query()).unwrap().cached);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_tolerance_of_one_unit() {
        let (service, _) = query_service(dec!(1));
        let data = service.query(&query()).unwrap();
        assert_eq!(data.equilibrium.difference, dec!(1));
        assert!(data.equilibrium.is_balanced);

        let (service, _) = query_service(dec!(1.5));
        assert!(!service.query(&query()).unwrap().equilibrium.is_balanced);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let (service, calls) = query_service(dec!(0));
        let mut inverted = query();
        std::mem::swap(&mut inverted.date_from, &mut inverted.date_to);

        assert!(matches!(
            service.query(&inverted),
            Err(BalanceError::InvalidDateRange { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_source_errors_are_not_cached() {
        let service = BalanceQueryService::new(FailingSource, &CacheSettings::default(), dec!(1));
        assert!(service.query(&query()).is_err());
        service.run_pending_tasks();
        assert_eq!(service.entry_count(), 0);
    }
}
