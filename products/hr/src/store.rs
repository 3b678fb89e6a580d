//! The employee store: collection, bookmarks, and filter criteria.

use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    filter::{FilterCriteria, filter_employees},
    model::{Department, Employee, EmployeeId},
    persist::{PersistedState, StateStorage},
};

pub struct EmployeeStore {
    employees: Vec<Employee>,
    bookmarked_ids: Vec<EmployeeId>,
    filters: FilterCriteria,
    storage: Arc<dyn StateStorage>,
}

impl EmployeeStore {
    /// Builds a default store and overlays whatever bookmark set `storage`
    /// holds. Missing or unreadable state yields an empty bookmark set.
    pub fn hydrate(storage: Arc<dyn StateStorage>) -> Self {
        let persisted = match storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<PersistedState>(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "persisted state unparseable; starting without bookmarks");
                    PersistedState::default()
                }
            },
            Ok(None) => {
                debug!("no persisted state found");
                PersistedState::default()
            }
            Err(err) => {
                warn!(error = %err, "persisted state unreadable; starting without bookmarks");
                PersistedState::default()
            }
        };

        let mut bookmarked_ids = Vec::with_capacity(persisted.bookmarked_ids.len());
        for id in persisted.bookmarked_ids {
            if !bookmarked_ids.contains(&id) {
                bookmarked_ids.push(id);
            }
        }
        info!(bookmarks = bookmarked_ids.len(), "employee store hydrated");

        Self {
            employees: Vec::new(),
            bookmarked_ids,
            filters: FilterCriteria::default(),
            storage,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn bookmarked_ids(&self) -> &[EmployeeId] {
        &self.bookmarked_ids
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn is_bookmarked(&self, id: EmployeeId) -> bool {
        self.bookmarked_ids.contains(&id)
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn set_employees(&mut self, employees: Vec<Employee>) {
        info!(count = employees.len(), "replacing employee collection");
        self.employees = employees;
        self.persist();
    }

    /// Flips membership of `id` and returns whether it is now bookmarked.
    pub fn toggle_bookmark(&mut self, id: EmployeeId) -> bool {
        let now_bookmarked = match self.bookmarked_ids.iter().position(|b| *b == id) {
            Some(idx) => {
                self.bookmarked_ids.remove(idx);
                false
            }
            None => {
                self.bookmarked_ids.push(id);
                true
            }
        };
        debug!(id, now_bookmarked, total = self.bookmarked_ids.len(), "bookmark toggled");
        self.persist();
        now_bookmarked
    }

    /// Drops every listed id that is currently bookmarked; returns how many went.
    pub fn remove_bookmarks(&mut self, ids: &[EmployeeId]) -> usize {
        let before = self.bookmarked_ids.len();
        self.bookmarked_ids.retain(|id| !ids.contains(id));
        let removed = before - self.bookmarked_ids.len();
        debug!(removed, "bookmarks removed");
        self.persist();
        removed
    }

    /// Removes the selected bookmarks and empties the selection.
    pub fn remove_selected(&mut self, selection: &mut BookmarkSelection) -> usize {
        let removed = self.remove_bookmarks(selection.ids());
        selection.clear();
        removed
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search_query = query.into();
        debug!(query = %self.filters.search_query, "search query updated");
        self.persist();
    }

    pub fn set_selected_departments(&mut self, departments: BTreeSet<Department>) {
        self.filters.selected_departments = departments;
        debug!(active = self.filters.active_count(), "department filter updated");
        self.persist();
    }

    pub fn set_selected_ratings(&mut self, ratings: BTreeSet<u8>) {
        self.filters.selected_ratings = ratings;
        debug!(active = self.filters.active_count(), "rating filter updated");
        self.persist();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterCriteria::default();
        self.persist();
    }

    pub fn filtered_employees(&self) -> Vec<&Employee> {
        filter_employees(&self.employees, &self.filters)
    }

    /// Bookmarked employees in collection order, not bookmark order.
    pub fn bookmarked_employees(&self) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|employee| self.is_bookmarked(employee.id))
            .collect()
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            bookmarked_ids: self.bookmarked_ids.clone(),
        }
    }

    fn persist(&self) {
        let result = self
            .persisted_state()
            .encode()
            .and_then(|raw| self.storage.save(&raw));
        if let Err(err) = result {
            warn!(error = %err, "failed to persist bookmarks");
        }
    }
}

/// Transient multi-select on the bookmarks view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookmarkSelection {
    ids: Vec<EmployeeId>,
}

impl BookmarkSelection {
    pub fn ids(&self) -> &[EmployeeId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn toggle(&mut self, id: EmployeeId) {
        match self.ids.iter().position(|s| *s == id) {
            Some(idx) => {
                self.ids.remove(idx);
            }
            None => self.ids.push(id),
        }
    }

    /// Selects every visible id, or clears when all of them are already selected.
    pub fn toggle_all(&mut self, visible: &[EmployeeId]) {
        if self.ids.len() == visible.len() {
            self.ids.clear();
        } else {
            self.ids = visible.to_vec();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
