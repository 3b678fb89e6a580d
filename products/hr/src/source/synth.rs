//! Synthetic performance data layered onto upstream user records.

use chrono::{Duration, NaiveDate};
use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;

use crate::model::{
    Address, Company, Department, Employee, EmployeeId, FeedbackEntry, MAX_RATING, MIN_RATING,
};

pub const DEFAULT_COMPANY_NAME: &str = "TechCorp Inc.";
pub const DEFAULT_TITLE: &str = "Employee";

pub const PROJECT_CATALOG: [&str; 12] = [
    "Website Redesign",
    "Mobile App Development",
    "Data Migration",
    "Security Audit",
    "Performance Optimization",
    "User Research",
    "Brand Guidelines",
    "API Integration",
    "Database Optimization",
    "Customer Portal",
    "Analytics Dashboard",
    "Payment System",
];

pub const FEEDBACK_AUTHORS: [&str; 8] = [
    "Sarah Johnson",
    "Mike Chen",
    "Emily Davis",
    "David Wilson",
    "Lisa Anderson",
    "Tom Brown",
    "Anna Garcia",
    "Chris Lee",
];

pub const FEEDBACK_COMMENTS: [&str; 7] = [
    "Excellent work on the recent project. Shows great attention to detail.",
    "Strong communication skills and team collaboration.",
    "Consistently meets deadlines and delivers quality work.",
    "Shows initiative and takes ownership of tasks.",
    "Great problem-solving abilities and technical skills.",
    "Positive attitude and willingness to help others.",
    "Demonstrates leadership potential and mentoring skills.",
];

const MAX_PROJECTS: usize = 4;
const MAX_FEEDBACK: usize = 5;
const FEEDBACK_WINDOW_DAYS: i64 = 365;

/// A user record as the directory API returns it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub phone: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Option<RawCompany>,
}

/// Upstream company block; its department is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsersPage {
    pub users: Vec<RawUser>,
}

pub struct Synthesizer<R> {
    rng: R,
    today: NaiveDate,
}

impl<R: Rng> Synthesizer<R> {
    /// `today` anchors the feedback date window.
    pub fn new(rng: R, today: NaiveDate) -> Self {
        Self { rng, today }
    }

    pub fn decorate(&mut self, raw: RawUser) -> Employee {
        let company = raw.company.unwrap_or_default();
        let department = *Department::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Department::Engineering);
        Employee {
            id: raw.id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            email: raw.email,
            age: raw.age,
            phone: raw.phone,
            image: raw.image,
            address: raw.address,
            company: Company {
                department,
                name: non_empty_or(company.name, DEFAULT_COMPANY_NAME),
                title: non_empty_or(company.title, DEFAULT_TITLE),
            },
            rating: self.rating(),
            projects: self.projects(),
            feedback: self.feedback(),
        }
    }

    fn rating(&mut self) -> u8 {
        self.rng.gen_range(MIN_RATING..=MAX_RATING)
    }

    fn projects(&mut self) -> Vec<String> {
        let mut catalog = PROJECT_CATALOG;
        catalog.shuffle(&mut self.rng);
        let take = self.rng.gen_range(1..=MAX_PROJECTS);
        catalog[..take].iter().map(|p| p.to_string()).collect()
    }

    fn feedback(&mut self) -> Vec<FeedbackEntry> {
        let count = self.rng.gen_range(1..=MAX_FEEDBACK);
        (0..count)
            .map(|index| {
                let author = FEEDBACK_AUTHORS[self.rng.gen_range(0..FEEDBACK_AUTHORS.len())];
                let comment = FEEDBACK_COMMENTS[self.rng.gen_range(0..FEEDBACK_COMMENTS.len())];
                let days_ago = self.rng.gen_range(0..FEEDBACK_WINDOW_DAYS);
                let date = self.today - Duration::days(days_ago);
                FeedbackEntry {
                    id: format!("feedback-{index}"),
                    author: author.to_string(),
                    comment: comment.to_string(),
                    date: date.format("%Y-%m-%d").to_string(),
                    rating: self.rating(),
                }
            })
            .collect()
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn raw(id: EmployeeId, company: Option<RawCompany>) -> RawUser {
        RawUser {
            id,
            first_name: "Emily".into(),
            last_name: "Johnson".into(),
            email: "emily.johnson@x.dummyjson.com".into(),
            age: 28,
            phone: "+81 965-431-3024".into(),
            image: "https://dummyjson.com/icon/emilys/128".into(),
            address: Address {
                street: "626 Main Street".into(),
                city: "Phoenix".into(),
                state: "Mississippi".into(),
                postal_code: "29112".into(),
                country: "United States".into(),
            },
            company,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn same_seed_same_decoration() {
        let mut a = Synthesizer::new(StdRng::seed_from_u64(7), today());
        let mut b = Synthesizer::new(StdRng::seed_from_u64(7), today());
        for id in 1..=5 {
            assert_eq!(a.decorate(raw(id, None)), b.decorate(raw(id, None)));
        }
    }

    #[test]
    fn synthetic_fields_stay_in_range() {
        let mut synth = Synthesizer::new(StdRng::seed_from_u64(99), today());
        let earliest = today() - Duration::days(FEEDBACK_WINDOW_DAYS);
        for id in 1..=200 {
            let employee = synth.decorate(raw(id, None));
            assert!((MIN_RATING..=MAX_RATING).contains(&employee.rating));
            assert!((1..=MAX_PROJECTS).contains(&employee.projects.len()));
            let mut unique = employee.projects.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), employee.projects.len());
            assert!(employee.projects.iter().all(|p| PROJECT_CATALOG.contains(&p.as_str())));

            assert!((1..=MAX_FEEDBACK).contains(&employee.feedback.len()));
            for (index, entry) in employee.feedback.iter().enumerate() {
                assert_eq!(entry.id, format!("feedback-{index}"));
                assert!(FEEDBACK_AUTHORS.contains(&entry.author.as_str()));
                assert!(FEEDBACK_COMMENTS.contains(&entry.comment.as_str()));
                assert!((MIN_RATING..=MAX_RATING).contains(&entry.rating));
                let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").unwrap();
                assert!(date > earliest && date <= today());
            }
        }
    }

    #[test]
    fn company_falls_back_when_missing_or_blank() {
        let mut synth = Synthesizer::new(StdRng::seed_from_u64(1), today());
        let missing = synth.decorate(raw(1, None));
        assert_eq!(missing.company.name, DEFAULT_COMPANY_NAME);
        assert_eq!(missing.company.title, DEFAULT_TITLE);

        let blank = synth.decorate(raw(
            2,
            Some(RawCompany {
                name: Some(String::new()),
                title: Some("Sales Manager".into()),
            }),
        ));
        assert_eq!(blank.company.name, DEFAULT_COMPANY_NAME);
        assert_eq!(blank.company.title, "Sales Manager");
    }

    #[test]
    fn personal_fields_copy_verbatim() {
        let mut synth = Synthesizer::new(StdRng::seed_from_u64(3), today());
        let employee = synth.decorate(raw(11, None));
        assert_eq!(employee.id, 11);
        assert_eq!(employee.full_name(), "Emily Johnson");
        assert_eq!(employee.address.city, "Phoenix");
        assert_eq!(employee.age, 28);
    }

    #[test]
    fn upstream_payload_parses_with_extra_fields() {
        let body = r#"{"users":[{"id":1,"firstName":"Emily","lastName":"Johnson","maidenName":"Smith",
            "age":28,"email":"emily@x.io","phone":"+81 1","image":"https://x/1.png",
            "address":{"address":"626 Main Street","city":"Phoenix","state":"Mississippi",
            "stateCode":"MS","postalCode":"29112","coordinates":{"lat":1.0,"lng":2.0},"country":"United States"},
            "company":{"department":"Engineering","name":"Dooley","title":"Sales Manager"}}],
            "total":208,"skip":0,"limit":1}"#;
        let page: UsersPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users[0].address.postal_code, "29112");
        assert_eq!(
            page.users[0].company.as_ref().and_then(|c| c.name.as_deref()),
            Some("Dooley")
        );
    }
}
