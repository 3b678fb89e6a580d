//! Employee records as held by the directory store.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier assigned by the upstream directory, stable for a session.
pub type EmployeeId = u32;

/// Lowest performance rating.
pub const MIN_RATING: u8 = 1;
/// Highest performance rating.
pub const MAX_RATING: u8 = 5;
/// Ratings at or above this count as high performers.
pub const HIGH_PERFORMER_RATING: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
pub enum Department {
    Engineering,
    Marketing,
    Sales,
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Operations,
    Design,
    Product,
    Legal,
    Support,
}

impl Department {
    /// Every department, in the order filter pickers present them.
    pub const ALL: [Department; 10] = [
        Department::Engineering,
        Department::Marketing,
        Department::Sales,
        Department::Hr,
        Department::Finance,
        Department::Operations,
        Department::Design,
        Department::Product,
        Department::Legal,
        Department::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::Design => "Design",
            Department::Product => "Product",
            Department::Legal => "Legal",
            Department::Support => "Support",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown department: {0}")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDepartment(needle.to_string()))
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "address", default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Company {
    pub department: Department,
    pub name: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct FeedbackEntry {
    pub id: String,
    pub author: String,
    pub comment: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub rating: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub phone: String,
    pub image: String,
    pub address: Address,
    pub company: Company,
    pub rating: u8,
    pub projects: Vec<String>,
    pub feedback: Vec<FeedbackEntry>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn department(&self) -> Department {
        self.company.department
    }

    pub fn is_high_performer(&self) -> bool {
        self.rating >= HIGH_PERFORMER_RATING
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal employee for derivation tests.
    pub fn employee(id: EmployeeId, department: Department, rating: u8) -> Employee {
        Employee {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("user{id}@example.com"),
            age: 30,
            phone: "+1 555 0100".into(),
            image: format!("https://example.com/{id}.png"),
            address: Address::default(),
            company: Company {
                department,
                name: "TechCorp Inc.".into(),
                title: "Employee".into(),
            },
            rating,
            projects: vec!["Data Migration".into()],
            feedback: Vec::new(),
        }
    }
}
