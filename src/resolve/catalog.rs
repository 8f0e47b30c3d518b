//! In-memory label index over a queried entity list
//!
//! A catalog is an immutable snapshot: it is built from the rows of one
//! query and passed by reference to whoever resolves against it. Labels that
//! normalize to the same key are kept as an ambiguity instead of letting the
//! later row shadow the earlier one.

use std::collections::HashMap;

use super::normalize::normalize;
use crate::models::{Choice, Identified};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Unique(i32),
    Ambiguous(Vec<i32>),
}

/// Result of an exact label lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(i32),
    /// Several entities share the normalized label
    Ambiguous(Vec<i32>),
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    slots: HashMap<String, Slot>,
    entries: Vec<Choice>,
}

impl CatalogIndex {
    pub fn build<T, F>(entities: &[T], label_fn: F) -> Self
    where
        T: Identified,
        F: Fn(&T) -> String,
    {
        let mut slots: HashMap<String, Slot> = HashMap::with_capacity(entities.len());
        let mut entries = Vec::with_capacity(entities.len());

        for entity in entities {
            let id = entity.id();
            let label = label_fn(entity);
            slots
                .entry(normalize(&label))
                .and_modify(|slot| match slot {
                    Slot::Unique(existing) if *existing != id => {
                        *slot = Slot::Ambiguous(vec![*existing, id]);
                    }
                    Slot::Ambiguous(ids) if !ids.contains(&id) => ids.push(id),
                    _ => {}
                })
                .or_insert(Slot::Unique(id));
            entries.push(Choice { id, label });
        }

        Self { slots, entries }
    }

    pub fn lookup_exact(&self, raw_label: &str) -> Lookup {
        match self.slots.get(&normalize(raw_label)) {
            Some(Slot::Unique(id)) => Lookup::Found(*id),
            Some(Slot::Ambiguous(ids)) => Lookup::Ambiguous(ids.clone()),
            None => Lookup::NotFound,
        }
    }

    /// Entries in query order, with their display labels
    pub fn entries(&self) -> &[Choice] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
