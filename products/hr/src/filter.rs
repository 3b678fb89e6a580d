//! Read-time filtering over the employee collection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Department, Employee};

/// Search text plus department and rating selections.
///
/// An empty criterion means "no constraint" on that dimension, never
/// "match nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_query: String,
    pub selected_departments: BTreeSet<Department>,
    pub selected_ratings: BTreeSet<u8>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_query.is_empty()
            && self.selected_departments.is_empty()
            && self.selected_ratings.is_empty()
    }

    /// Number of department and rating chips currently active.
    pub fn active_count(&self) -> usize {
        self.selected_departments.len() + self.selected_ratings.len()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        matches_search(employee, &self.search_query)
            && (self.selected_departments.is_empty()
                || self.selected_departments.contains(&employee.department()))
            && (self.selected_ratings.is_empty() || self.selected_ratings.contains(&employee.rating))
    }
}

fn matches_search(employee: &Employee, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        employee.first_name.as_str(),
        employee.last_name.as_str(),
        employee.email.as_str(),
        employee.department().as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Employees passing every criterion, in their original relative order.
pub fn filter_employees<'a>(employees: &'a [Employee], criteria: &FilterCriteria) -> Vec<&'a Employee> {
    employees.iter().filter(|employee| criteria.matches(employee)).collect()
}
