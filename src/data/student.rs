use crate::{
    data::{Record, RequiredFields, Roster, Submission, non_blank, parse_date, postgres::PgRoster},
    error::{AcademicaResult, MakeQuerySnafu, StoreError, StoreResult},
    state::AcademicaState,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    #[sqlx(rename = "apellido")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "edad")]
    #[sqlx(rename = "edad")]
    pub age: Option<i32>,
    #[serde(rename = "grado")]
    #[sqlx(rename = "grado")]
    pub grade: Option<String>,
    #[serde(rename = "fechaIngreso")]
    #[sqlx(rename = "fecha_ingreso")]
    pub enrolled_on: NaiveDate,
    #[serde(rename = "activo")]
    #[sqlx(rename = "activo")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub age: Option<i32>,
    pub grade: Option<String>,
    pub enrolled_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentForm {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "edad", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(rename = "grado", default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(rename = "fechaIngreso", default, skip_serializing_if = "Option::is_none")]
    pub enrolled_on: Option<String>,
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        Self {
            first_name: Some(student.first_name.clone()),
            surname: Some(student.surname.clone()),
            email: Some(student.email.clone()),
            age: student.age,
            grade: student.grade.clone(),
            enrolled_on: Some(student.enrolled_on.format("%Y-%m-%d").to_string()),
            active: Some(student.active),
        }
    }
}

impl Record for Student {
    type Draft = NewStudent;
    type Form = StudentForm;

    const SINGULAR: &'static str = "estudiante";
    const PLURAL: &'static str = "estudiantes";

    fn id(&self) -> i64 {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn from_draft(id: i64, draft: NewStudent, active: bool) -> Self {
        let NewStudent {
            first_name,
            surname,
            email,
            age,
            grade,
            enrolled_on,
        } = draft;

        Self {
            id,
            first_name,
            surname,
            email,
            age,
            grade,
            enrolled_on,
            active,
        }
    }

    fn validate(form: StudentForm) -> AcademicaResult<Submission<NewStudent>> {
        let StudentForm {
            first_name,
            surname,
            email,
            age,
            grade,
            enrolled_on,
            active,
        } = form;

        let mut required = RequiredFields::default();
        let first_name = required.take("nombre", first_name);
        let surname = required.take("apellido", surname);
        let email = required.take("email", email);
        let enrolled_on = required.take("fechaIngreso", enrolled_on);
        required.finish()?;

        Ok(Submission {
            draft: NewStudent {
                first_name,
                surname,
                email,
                age,
                grade: non_blank(grade),
                enrolled_on: parse_date("fechaIngreso", enrolled_on)?,
            },
            active,
        })
    }

    fn roster(state: &AcademicaState) -> &dyn Roster<Self> {
        state.students()
    }
}

#[async_trait]
impl Roster<Student> for PgRoster {
    async fn list_active(&self) -> StoreResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT id, nombre, apellido, email, edad, grado, fecha_ingreso, activo FROM public.estudiantes WHERE activo ORDER BY id DESC",
        )
        .fetch_all(self.pool())
        .await
        .context(MakeQuerySnafu)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT id, nombre, apellido, email, edad, grado, fecha_ingreso, activo FROM public.estudiantes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert(&self, draft: NewStudent) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO public.estudiantes (nombre, apellido, email, edad, grado, fecha_ingreso) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&draft.first_name)
        .bind(&draft.surname)
        .bind(&draft.email)
        .bind(draft.age)
        .bind(&draft.grade)
        .bind(draft.enrolled_on)
        .fetch_one(self.pool())
        .await
        .map_err(|source| StoreError::from_write(source, &draft.email))
    }

    async fn replace(&self, id: i64, draft: NewStudent, active: Option<bool>) -> StoreResult<()> {
        sqlx::query(
            "UPDATE public.estudiantes SET nombre = $2, apellido = $3, email = $4, edad = $5, grado = $6, fecha_ingreso = $7, activo = COALESCE($8, activo) WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.surname)
        .bind(&draft.email)
        .bind(draft.age)
        .bind(&draft.grade)
        .bind(draft.enrolled_on)
        .bind(active)
        .execute(self.pool())
        .await
        .map_err(|source| StoreError::from_write(source, &draft.email))?;
        Ok(())
    }

    async fn deactivate(&self, id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE public.estudiantes SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcademicaError;
    use serde_json::json;

    fn form(value: serde_json::Value) -> StudentForm {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn optional_fields_default_to_null() {
        let Submission { draft, active } = Student::validate(form(json!({
            "nombre": "Ana",
            "apellido": "Lopez",
            "email": "ana@x.com",
            "fechaIngreso": "2024-01-10",
        })))
        .unwrap();

        assert_eq!(draft.age, None);
        assert_eq!(draft.grade, None);
        assert_eq!(active, None);

        let student = Student::from_draft(1, draft, true);
        let body = serde_json::to_value(&student).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 1,
                "nombre": "Ana",
                "apellido": "Lopez",
                "email": "ana@x.com",
                "edad": null,
                "grado": null,
                "fechaIngreso": "2024-01-10",
                "activo": true,
            })
        );
    }

    #[test]
    fn missing_required_fields_are_named() {
        let err = Student::validate(form(json!({ "nombre": "Ana", "edad": 12 }))).unwrap_err();

        match err {
            AcademicaError::MissingRequiredFields { fields } => {
                assert_eq!(fields, vec!["apellido", "email", "fechaIngreso"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn form_round_trips_an_existing_student() {
        let student = Student {
            id: 7,
            first_name: "Luis".to_owned(),
            surname: "Perez".to_owned(),
            email: "luis@x.com".to_owned(),
            age: Some(15),
            grade: Some("10°".to_owned()),
            enrolled_on: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
            active: false,
        };

        let Submission { draft, active } = Student::validate(StudentForm::from(&student)).unwrap();
        assert_eq!(active, Some(false));
        assert_eq!(Student::from_draft(7, draft, false), student);
    }
}
