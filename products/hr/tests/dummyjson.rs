use httpmock::prelude::*;
use products_hr::{Department, DummyJsonSource, EmployeeSource, SourceError};
use serde_json::json;

fn users_body(count: u32) -> serde_json::Value {
    let users: Vec<_> = (1..=count)
        .map(|id| {
            json!({
                "id": id,
                "firstName": format!("First{id}"),
                "lastName": "Doe",
                "email": format!("user{id}@x.dummyjson.com"),
                "age": 30 + id,
                "phone": "+1 555 0100",
                "image": format!("https://dummyjson.com/icon/{id}/128"),
                "address": {
                    "address": "1 Main Street",
                    "city": "Phoenix",
                    "state": "Arizona",
                    "postalCode": "85001",
                    "country": "United States"
                },
                "company": { "department": "Not A Department", "name": "Dooley", "title": "" }
            })
        })
        .collect();
    json!({ "users": users, "total": 208, "skip": 0, "limit": count })
}

#[tokio::test]
async fn fetches_a_page_of_twenty_and_decorates_it() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("limit", "20");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(users_body(20));
        })
        .await;

    let source = DummyJsonSource::new(server.base_url()).with_seed(Some(42));
    let employees = source.fetch_employees().await.expect("fetch succeeds");

    mock.assert_async().await;
    assert_eq!(employees.len(), 20);
    let first = &employees[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.address.postal_code, "85001");
    assert_eq!(first.company.name, "Dooley");
    assert_eq!(first.company.title, "Employee");
    assert!(Department::ALL.contains(&first.company.department));
    assert!((1..=5).contains(&first.rating));
}

#[tokio::test]
async fn seeded_sources_agree() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(users_body(5));
        })
        .await;

    let a = DummyJsonSource::new(server.base_url()).with_seed(Some(7));
    let b = DummyJsonSource::new(server.base_url()).with_seed(Some(7));
    let left = a.fetch_employees().await.unwrap();
    let right = b.fetch_employees().await.unwrap();
    let summary = |list: &[products_hr::Employee]| {
        list.iter()
            .map(|e| (e.company.department, e.rating, e.projects.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&left), summary(&right));
}

#[tokio::test]
async fn server_errors_are_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(503).body("maintenance");
        })
        .await;

    let err = DummyJsonSource::new(server.base_url())
        .fetch_employees()
        .await
        .unwrap_err();
    match err {
        SourceError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body(r#"{"people": []}"#);
        })
        .await;

    let err = DummyJsonSource::new(server.base_url())
        .page_size(5)
        .fetch_employees()
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)), "got {err:?}");
}
