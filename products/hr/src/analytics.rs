//! Aggregates backing the analytics view.

use serde::Serialize;

use crate::model::{Department, Employee, MAX_RATING, MIN_RATING};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department: Department,
    pub employee_count: usize,
    /// Mean rating rounded to one decimal.
    pub avg_rating: f64,
    pub high_performers: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_employees: usize,
    pub avg_rating: f64,
    pub high_performers: usize,
    /// Share of high performers, percent with one decimal.
    pub high_performer_share: f64,
    pub department_count: usize,
    pub bookmarked: usize,
    /// Groups in first-encountered order.
    pub departments: Vec<DepartmentStats>,
    pub rating_distribution: Vec<RatingBucket>,
    pub top_department: Option<DepartmentStats>,
}

struct Accumulator {
    department: Department,
    total: u32,
    count: usize,
    high: usize,
}

impl AnalyticsReport {
    pub fn from_employees<'a, I>(employees: I, bookmarked: usize) -> Self
    where
        I: IntoIterator<Item = &'a Employee>,
    {
        let mut groups: Vec<Accumulator> = Vec::new();
        let mut buckets: Vec<RatingBucket> = (MIN_RATING..=MAX_RATING)
            .map(|rating| RatingBucket { rating, count: 0 })
            .collect();
        let mut rating_sum = 0u32;
        let mut total = 0usize;
        let mut high_performers = 0usize;

        for employee in employees {
            total += 1;
            rating_sum += u32::from(employee.rating);
            let department = employee.department();
            let idx = match groups.iter().position(|g| g.department == department) {
                Some(idx) => idx,
                None => {
                    groups.push(Accumulator {
                        department,
                        total: 0,
                        count: 0,
                        high: 0,
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];
            group.total += u32::from(employee.rating);
            group.count += 1;
            if employee.is_high_performer() {
                group.high += 1;
                high_performers += 1;
            }
            if let Some(bucket) = buckets.iter_mut().find(|b| b.rating == employee.rating) {
                bucket.count += 1;
            }
        }

        let departments: Vec<DepartmentStats> = groups
            .into_iter()
            .map(|g| DepartmentStats {
                department: g.department,
                employee_count: g.count,
                avg_rating: round1(f64::from(g.total) / g.count as f64),
                high_performers: g.high,
            })
            .collect();

        let top_department = departments
            .iter()
            .fold(None::<&DepartmentStats>, |best, current| match best {
                Some(best) if best.avg_rating >= current.avg_rating => Some(best),
                _ => Some(current),
            })
            .cloned();

        Self {
            total_employees: total,
            avg_rating: ratio(f64::from(rating_sum), total),
            high_performers,
            high_performer_share: ratio(high_performers as f64 * 100.0, total),
            department_count: departments.len(),
            bookmarked,
            departments,
            rating_distribution: buckets,
            top_department,
        }
    }
}

fn ratio(numerator: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round1(numerator / count as f64)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
