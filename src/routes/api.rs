use crate::{
    data::{Record, Roster, Submission},
    error::{AcademicaResult, MissingRecordSnafu, StoreSnafu},
    routes::extractors::{ApiJson, RecordId},
    state::AcademicaState,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub ok: bool,
}

/// Re-reads a row after a write. Nothing wraps the write and this read, so a concurrent
/// writer's change can show up here.
async fn read_back<R: Record>(
    roster: &dyn Roster<R>,
    id: i64,
    action: &'static str,
) -> AcademicaResult<R> {
    roster
        .get_by_id(id)
        .await
        .context(StoreSnafu {
            action,
            noun: R::SINGULAR,
        })?
        .context(MissingRecordSnafu {
            noun: R::SINGULAR,
            id,
        })
}

pub async fn list_records<R: Record>(
    State(state): State<AcademicaState>,
) -> AcademicaResult<Json<Vec<R>>> {
    let records = R::roster(&state)
        .list_active()
        .await
        .context(StoreSnafu {
            action: "list",
            noun: R::PLURAL,
        })?;

    Ok(Json(records))
}

pub async fn create_record<R: Record>(
    State(state): State<AcademicaState>,
    ApiJson(form): ApiJson<R::Form>,
) -> AcademicaResult<(StatusCode, Json<R>)> {
    let Submission { draft, active: _ } = R::validate(form)?;
    let roster = R::roster(&state);

    let id = roster.insert(draft).await.context(StoreSnafu {
        action: "create",
        noun: R::SINGULAR,
    })?;
    let record = read_back(roster, id, "create").await?;

    info!(noun = R::SINGULAR, id, "Created record");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_record<R: Record>(
    State(state): State<AcademicaState>,
    RecordId(id): RecordId,
) -> AcademicaResult<Json<R>> {
    read_back(R::roster(&state), id, "fetch").await.map(Json)
}

pub async fn update_record<R: Record>(
    State(state): State<AcademicaState>,
    RecordId(id): RecordId,
    ApiJson(form): ApiJson<R::Form>,
) -> AcademicaResult<Json<R>> {
    let Submission { draft, active } = R::validate(form)?;
    let roster = R::roster(&state);

    roster
        .replace(id, draft, active)
        .await
        .context(StoreSnafu {
            action: "update",
            noun: R::SINGULAR,
        })?;
    let record = read_back(roster, id, "update").await?;

    info!(noun = R::SINGULAR, id, active = record.is_active(), "Updated record");
    Ok(Json(record))
}

pub async fn delete_record<R: Record>(
    State(state): State<AcademicaState>,
    RecordId(id): RecordId,
) -> AcademicaResult<Json<Acknowledgement>> {
    R::roster(&state)
        .deactivate(id)
        .await
        .context(StoreSnafu {
            action: "delete",
            noun: R::SINGULAR,
        })?;

    info!(noun = R::SINGULAR, id, "Deactivated record");
    Ok(Json(Acknowledgement { ok: true }))
}

#[cfg(test)]
mod tests {
    use crate::{
        data::memory::MemoryRoster,
        routes::router,
        state::AcademicaState,
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryRoster>) {
        let roster = Arc::new(MemoryRoster::new());
        (router(AcademicaState::with_roster(roster.clone())), roster)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn ana() -> Value {
        json!({
            "nombre": "Ana",
            "apellido": "Lopez",
            "email": "ana@x.com",
            "fechaIngreso": "2024-01-10",
        })
    }

    #[tokio::test]
    async fn create_then_fetch_then_list() {
        let (app, _) = app();

        let (status, created) = call(&app, Method::POST, "/api/estudiantes", Some(ana())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["nombre"], "Ana");
        assert!(created["edad"].is_null());
        assert!(created["grado"].is_null());
        assert_eq!(created["fechaIngreso"], "2024-01-10");

        let (status, fetched) = call(&app, Method::GET, "/api/estudiantes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, listed) = call(&app, Method::GET, "/api/estudiantes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (app, _) = app();
        for email in ["a@x.com", "b@x.com"] {
            let mut body = ana();
            body["email"] = json!(email);
            call(&app, Method::POST, "/api/estudiantes", Some(body)).await;
        }

        let (_, listed) = call(&app, Method::GET, "/api/estudiantes", None).await;
        let ids: Vec<i64> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn create_requires_the_mandatory_fields() {
        let (app, _) = app();

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/maestros",
            Some(json!({ "nombre": "Marta", "email": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Missing required fields: apellido, email, fechaContratacion"
        );

        let (_, listed) = call(&app, Method::GET, "/api/maestros", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn whitespace_only_required_fields_are_missing() {
        let (app, _) = app();
        let mut body = ana();
        body["nombre"] = json!("   ");

        let (status, body) = call(&app, Method::POST, "/api/estudiantes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: nombre");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_distinguishable_conflict() {
        let (app, _) = app();
        call(&app, Method::POST, "/api/estudiantes", Some(ana())).await;

        let (status, body) = call(&app, Method::POST, "/api/estudiantes", Some(ana())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");

        let (_, listed) = call(&app, Method::GET, "/api/estudiantes", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list_but_not_from_fetch() {
        let (app, _) = app();
        call(&app, Method::POST, "/api/estudiantes", Some(ana())).await;

        let (status, body) = call(&app, Method::DELETE, "/api/estudiantes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (_, listed) = call(&app, Method::GET, "/api/estudiantes", None).await;
        assert_eq!(listed, json!([]));

        let (status, fetched) = call(&app, Method::GET, "/api/estudiantes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["activo"], false);
    }

    #[tokio::test]
    async fn updating_an_inactive_record_only_reactivates_on_request() {
        let (app, _) = app();
        call(&app, Method::POST, "/api/estudiantes", Some(ana())).await;
        call(&app, Method::DELETE, "/api/estudiantes/1", None).await;

        let mut edit = ana();
        edit["grado"] = json!("10°");
        let (status, updated) = call(&app, Method::PUT, "/api/estudiantes/1", Some(edit.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["grado"], "10°");
        assert_eq!(updated["activo"], false);

        edit["activo"] = json!(true);
        let (_, updated) = call(&app, Method::PUT, "/api/estudiantes/1", Some(edit)).await;
        assert_eq!(updated["activo"], true);

        let (_, listed) = call(&app, Method::GET, "/api/estudiantes", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let (app, _) = app();
        let mut body = ana();
        body["edad"] = json!(12);
        body["grado"] = json!("7°");
        call(&app, Method::POST, "/api/estudiantes", Some(body)).await;

        let (status, updated) = call(&app, Method::PUT, "/api/estudiantes/1", Some(ana())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(updated["edad"].is_null());
        assert!(updated["grado"].is_null());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (app, _) = app();

        let (status, body) = call(&app, Method::GET, "/api/maestros/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, _) = call(&app, Method::PUT, "/api/estudiantes/99", Some(ana())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_ids_and_bodies_are_client_errors() {
        let (app, _) = app();

        let (status, body) = call(&app, Method::GET, "/api/estudiantes/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid id"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/estudiantes")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_failures_are_generic_server_errors() {
        let (app, roster) = app();
        roster.set_unavailable(true);

        let (status, body) = call(&app, Method::GET, "/api/maestros", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to list maestros");

        let (status, body) = call(&app, Method::DELETE, "/api/maestros/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to delete maestro");
    }
}
