// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::{FilterPatch, LeadFilters};

pub const LEAD_FILTERS_KEY: &str = "leadFilters";

/// String key/value storage that outlives a single session.
pub trait PreferenceStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Session-only storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Reads saved filters merged over the defaults. Never fails: a missing or
/// unreadable entry yields the defaults.
pub fn load_saved_filters(store: &dyn PreferenceStore) -> LeadFilters {
    let mut filters = LeadFilters::default();
    match read_filter_patch(store) {
        Ok(Some(patch)) => filters.merge(patch),
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(key = LEAD_FILTERS_KEY, "ignoring saved filters: {error:#}");
        }
    }
    filters
}

fn read_filter_patch(store: &dyn PreferenceStore) -> Result<Option<FilterPatch>> {
    let Some(raw) = store.get_item(LEAD_FILTERS_KEY)? else {
        return Ok(None);
    };
    let patch = serde_json::from_str(&raw)
        .with_context(|| format!("parse saved filters {raw:?}"))?;
    Ok(Some(patch))
}

/// Best-effort write; failures are logged and dropped.
pub fn save_filters(store: &dyn PreferenceStore, filters: &LeadFilters) {
    let result = serde_json::to_string(filters)
        .context("encode filters")
        .and_then(|raw| store.set_item(LEAD_FILTERS_KEY, &raw));
    if let Err(error) = result {
        tracing::warn!(key = LEAD_FILTERS_KEY, "failed to save filters: {error:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LEAD_FILTERS_KEY, MemoryPreferences, PreferenceStore, load_saved_filters, save_filters,
    };
    use crate::{LeadFilters, LeadStatus, SortKey, SortOrder, StatusFilter};
    use anyhow::{Result, bail};

    struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            bail!("storage unavailable")
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            bail!("quota exceeded")
        }
    }

    #[test]
    fn missing_entry_yields_defaults() {
        let store = MemoryPreferences::new();
        assert_eq!(load_saved_filters(&store), LeadFilters::default());
    }

    #[test]
    fn corrupt_entry_yields_defaults() -> Result<()> {
        let store = MemoryPreferences::new();
        store.set_item(LEAD_FILTERS_KEY, "{not json")?;
        assert_eq!(load_saved_filters(&store), LeadFilters::default());
        Ok(())
    }

    #[test]
    fn partial_entry_merges_over_defaults() -> Result<()> {
        let store = MemoryPreferences::new();
        store.set_item(LEAD_FILTERS_KEY, r#"{"status":"qualified","sortBy":"name"}"#)?;
        let filters = load_saved_filters(&store);
        assert_eq!(filters.status, StatusFilter::Only(LeadStatus::Qualified));
        assert_eq!(filters.sort_by, SortKey::Name);
        assert_eq!(filters.sort_order, SortOrder::Desc);
        assert_eq!(filters.search, "");
        Ok(())
    }

    #[test]
    fn saved_filters_load_back() {
        let store = MemoryPreferences::new();
        let filters = LeadFilters {
            search: "acme".to_owned(),
            status: StatusFilter::Only(LeadStatus::New),
            sort_by: SortKey::Company,
            sort_order: SortOrder::Asc,
        };
        save_filters(&store, &filters);
        assert_eq!(load_saved_filters(&store), filters);
    }

    #[test]
    fn broken_storage_is_contained() {
        save_filters(&BrokenPreferences, &LeadFilters::default());
        assert_eq!(load_saved_filters(&BrokenPreferences), LeadFilters::default());
    }

    #[test]
    fn clones_share_storage() -> Result<()> {
        let store = MemoryPreferences::new();
        let handle = store.clone();
        store.set_item("k", "v")?;
        assert_eq!(handle.get_item("k")?.as_deref(), Some("v"));
        Ok(())
    }
}
