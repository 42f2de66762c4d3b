use crate::{
    data::{
        Roster,
        memory::MemoryRoster,
        student::{NewStudent, Student},
        teacher::{NewTeacher, Teacher},
    },
    routes::router,
    state::AcademicaState,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use std::sync::Arc;
use tower::ServiceExt;

pub fn app() -> (Router, Arc<MemoryRoster>) {
    let roster = Arc::new(MemoryRoster::new());
    (router(AcademicaState::with_roster(roster.clone())), roster)
}

/// GETs a server-rendered page and returns its status and HTML.
pub async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn seed_student(roster: &MemoryRoster, first_name: &str, surname: &str) -> i64 {
    let draft = NewStudent {
        first_name: first_name.to_owned(),
        surname: surname.to_owned(),
        email: format!("{}@x.com", first_name.to_lowercase()),
        age: Some(14),
        grade: Some("9°".to_owned()),
        enrolled_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    };
    Roster::<Student>::insert(roster, draft)
        .await
        .unwrap()
}

pub async fn seed_teacher(roster: &MemoryRoster, surname: &str, specialty: &str) -> i64 {
    let draft = NewTeacher {
        first_name: "Marta".to_owned(),
        surname: surname.to_owned(),
        email: format!("{}@x.com", surname.to_lowercase()),
        specialty: Some(specialty.to_owned()),
        phone: None,
        hired_on: NaiveDate::from_ymd_opt(2019, 8, 15).unwrap(),
    };
    Roster::<Teacher>::insert(roster, draft)
        .await
        .unwrap()
}
