//! Last-request-wins person search for picker fields
//!
//! Each picker field has at most one search in flight. Starting a new search
//! on a field aborts the previous one, and a search that finishes after it was
//! superseded reports [`SearchOutcome::Superseded`] instead of its rows, so a
//! slow response can never replace the results of a newer query.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use tokio::task::AbortHandle;

use super::catalog::CatalogIndex;
use crate::{models::MaintenancePerson, repository::lookup::ReferenceLookup};

#[derive(Debug)]
pub enum SearchOutcome {
    /// Fresh catalog for the latest query on the field
    Ready(CatalogIndex),
    /// A newer search on the same field was started
    Superseded,
}

struct Pending {
    ticket: u64,
    abort: AbortHandle,
}

type Inflight = Mutex<HashMap<String, Pending>>;

fn lock(inflight: &Inflight) -> MutexGuard<'_, HashMap<String, Pending>> {
    inflight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases a field's slot when its search ends or its caller goes away.
/// Aborting an already finished task is a no-op.
struct Slot<'a> {
    inflight: &'a Inflight,
    field: &'a str,
    ticket: u64,
    abort: AbortHandle,
}

impl Slot<'_> {
    fn is_current(&self) -> bool {
        lock(self.inflight).get(self.field).map(|p| p.ticket) == Some(self.ticket)
    }
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        self.abort.abort();
        let mut inflight = lock(self.inflight);
        if inflight.get(self.field).map(|p| p.ticket) == Some(self.ticket) {
            inflight.remove(self.field);
        }
    }
}

pub struct Typeahead<L: ?Sized> {
    lookup: Arc<L>,
    debounce: Duration,
    tickets: AtomicU64,
    inflight: Inflight,
}

impl<L: ReferenceLookup + ?Sized + 'static> Typeahead<L> {
    pub fn new(lookup: Arc<L>, debounce: Duration) -> Self {
        Self {
            lookup,
            debounce,
            tickets: AtomicU64::new(0),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Search people for `field`, cancelling any earlier search on it.
    /// Lookup failures degrade to an empty catalog.
    pub async fn search(&self, field: &str, query: &str) -> SearchOutcome {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let lookup = Arc::clone(&self.lookup);
        let debounce = self.debounce;
        let query = query.trim().to_string();

        let task = tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            lookup.search_people(&query).await
        });

        let previous = lock(&self.inflight).insert(
            field.to_string(),
            Pending {
                ticket,
                abort: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            previous.abort.abort();
        }
        let slot = Slot {
            inflight: &self.inflight,
            field,
            ticket,
            abort: task.abort_handle(),
        };

        let joined = task.await;
        if !slot.is_current() {
            return SearchOutcome::Superseded;
        }
        drop(slot);

        match joined {
            Ok(Ok(people)) => SearchOutcome::Ready(CatalogIndex::build(&people, MaintenancePerson::label)),
            Ok(Err(e)) => {
                tracing::debug!(field, error = %e, "person search failed, treating as no match");
                SearchOutcome::Ready(CatalogIndex::default())
            }
            Err(e) => {
                tracing::debug!(field, error = %e, "person search task ended early");
                SearchOutcome::Ready(CatalogIndex::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{AppError, AppResult},
        models::EquipmentCode,
        validation::{RefTable, UniqueKey},
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;

    /// Answers after a delay taken from the query, e.g. "slow" waits longer
    struct SlowLookup;

    fn person(id: i32, national_id: &str) -> MaintenancePerson {
        MaintenancePerson {
            id,
            national_id: national_id.into(),
            given_names: "Ana".into(),
            family_names: "Pérez".into(),
            position_id: None,
            position_name: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait]
    impl ReferenceLookup for SlowLookup {
        async fn equipment_codes(&self) -> AppResult<Vec<EquipmentCode>> {
            Ok(Vec::new())
        }

        async fn search_people(&self, query: &str) -> AppResult<Vec<MaintenancePerson>> {
            match query {
                "slow" => {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Ok(vec![person(1, "1111")])
                }
                "broken" => Err(AppError::Internal("store unavailable".into())),
                _ => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok(vec![person(2, "2222")])
                }
            }
        }

        async fn exists(&self, _table: RefTable, _id: i32) -> AppResult<bool> {
            Ok(true)
        }

        async fn is_taken(&self, _key: UniqueKey, _value: &str, _exclude: Option<i32>) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn ids(outcome: &SearchOutcome) -> Vec<i32> {
        match outcome {
            SearchOutcome::Ready(catalog) => catalog.entries().iter().map(|c| c.id).collect(),
            SearchOutcome::Superseded => panic!("search was superseded"),
        }
    }

    #[tokio::test]
    async fn newer_search_supersedes_slow_one() {
        let typeahead = Arc::new(Typeahead::new(Arc::new(SlowLookup), Duration::ZERO));

        let first = {
            let typeahead = Arc::clone(&typeahead);
            tokio::spawn(async move { typeahead.search("person", "slow").await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        let second = typeahead.search("person", "fast").await;

        assert_eq!(ids(&second), vec![2]);
        assert!(matches!(first.await.unwrap(), SearchOutcome::Superseded));
    }

    #[tokio::test]
    async fn fields_do_not_cancel_each_other() {
        let typeahead = Arc::new(Typeahead::new(Arc::new(SlowLookup), Duration::ZERO));

        let other_field = {
            let typeahead = Arc::clone(&typeahead);
            tokio::spawn(async move { typeahead.search("supervisor", "slow").await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        let outcome = typeahead.search("person", "fast").await;

        assert_eq!(ids(&outcome), vec![2]);
        assert_eq!(ids(&other_field.await.unwrap()), vec![1]);
    }

    /// Counts searches that ran to completion
    #[derive(Default)]
    struct CountingLookup {
        finished: AtomicUsize,
    }

    #[async_trait]
    impl ReferenceLookup for CountingLookup {
        async fn equipment_codes(&self) -> AppResult<Vec<EquipmentCode>> {
            Ok(Vec::new())
        }

        async fn search_people(&self, _query: &str) -> AppResult<Vec<MaintenancePerson>> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(vec![person(3, "3333")])
        }

        async fn exists(&self, _table: RefTable, _id: i32) -> AppResult<bool> {
            Ok(true)
        }

        async fn is_taken(&self, _key: UniqueKey, _value: &str, _exclude: Option<i32>) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn abandoned_search_frees_its_field() {
        let lookup = Arc::new(CountingLookup::default());
        let typeahead = Typeahead::new(Arc::clone(&lookup), Duration::ZERO);

        let abandoned = tokio::time::timeout(Duration::from_millis(20), typeahead.search("7:person", "ana")).await;
        assert!(abandoned.is_err());
        assert!(lock(&typeahead.inflight).is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(lookup.finished.load(Ordering::SeqCst), 0);

        assert_eq!(ids(&typeahead.search("7:person", "ana").await), vec![3]);
        assert!(lock(&typeahead.inflight).is_empty());
    }

    #[tokio::test]
    async fn lookup_errors_degrade_to_no_match() {
        let typeahead = Typeahead::new(Arc::new(SlowLookup), Duration::ZERO);
        let outcome = typeahead.search("person", "broken").await;
        assert!(ids(&outcome).is_empty());
    }

    #[tokio::test]
    async fn catalog_labels_follow_picker_format() {
        let typeahead = Typeahead::new(Arc::new(SlowLookup), Duration::from_millis(5));
        match typeahead.search("person", "fast").await {
            SearchOutcome::Ready(catalog) => {
                assert_eq!(catalog.entries()[0].label, "2222 — Pérez, Ana");
            }
            SearchOutcome::Superseded => panic!("search was superseded"),
        }
    }
}
