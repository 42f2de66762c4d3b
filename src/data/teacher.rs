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
pub struct Teacher {
    pub id: i64,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    #[sqlx(rename = "apellido")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "especialidad")]
    #[sqlx(rename = "especialidad")]
    pub specialty: Option<String>,
    #[serde(rename = "telefono")]
    #[sqlx(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "fechaContratacion")]
    #[sqlx(rename = "fecha_contratacion")]
    pub hired_on: NaiveDate,
    #[serde(rename = "activo")]
    #[sqlx(rename = "activo")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeacher {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub hired_on: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherForm {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "especialidad", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        rename = "fechaContratacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hired_on: Option<String>,
    #[serde(rename = "activo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl From<&Teacher> for TeacherForm {
    fn from(teacher: &Teacher) -> Self {
        Self {
            first_name: Some(teacher.first_name.clone()),
            surname: Some(teacher.surname.clone()),
            email: Some(teacher.email.clone()),
            specialty: teacher.specialty.clone(),
            phone: teacher.phone.clone(),
            hired_on: Some(teacher.hired_on.format("%Y-%m-%d").to_string()),
            active: Some(teacher.active),
        }
    }
}

impl Record for Teacher {
    type Draft = NewTeacher;
    type Form = TeacherForm;

    const SINGULAR: &'static str = "maestro";
    const PLURAL: &'static str = "maestros";

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

    fn from_draft(id: i64, draft: NewTeacher, active: bool) -> Self {
        let NewTeacher {
            first_name,
            surname,
            email,
            specialty,
            phone,
            hired_on,
        } = draft;

        Self {
            id,
            first_name,
            surname,
            email,
            specialty,
            phone,
            hired_on,
            active,
        }
    }

    fn validate(form: TeacherForm) -> AcademicaResult<Submission<NewTeacher>> {
        let TeacherForm {
            first_name,
            surname,
            email,
            specialty,
            phone,
            hired_on,
            active,
        } = form;

        let mut required = RequiredFields::default();
        let first_name = required.take("nombre", first_name);
        let surname = required.take("apellido", surname);
        let email = required.take("email", email);
        let hired_on = required.take("fechaContratacion", hired_on);
        required.finish()?;

        Ok(Submission {
            draft: NewTeacher {
                first_name,
                surname,
                email,
                specialty: non_blank(specialty),
                phone: non_blank(phone),
                hired_on: parse_date("fechaContratacion", hired_on)?,
            },
            active,
        })
    }

    fn roster(state: &AcademicaState) -> &dyn Roster<Self> {
        state.teachers()
    }
}

#[async_trait]
impl Roster<Teacher> for PgRoster {
    async fn list_active(&self) -> StoreResult<Vec<Teacher>> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, nombre, apellido, email, especialidad, telefono, fecha_contratacion, activo FROM public.maestros WHERE activo ORDER BY id DESC",
        )
        .fetch_all(self.pool())
        .await
        .context(MakeQuerySnafu)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Teacher>> {
        sqlx::query_as::<_, Teacher>(
            "SELECT id, nombre, apellido, email, especialidad, telefono, fecha_contratacion, activo FROM public.maestros WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert(&self, draft: NewTeacher) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO public.maestros (nombre, apellido, email, especialidad, telefono, fecha_contratacion) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&draft.first_name)
        .bind(&draft.surname)
        .bind(&draft.email)
        .bind(&draft.specialty)
        .bind(&draft.phone)
        .bind(draft.hired_on)
        .fetch_one(self.pool())
        .await
        .map_err(|source| StoreError::from_write(source, &draft.email))
    }

    async fn replace(&self, id: i64, draft: NewTeacher, active: Option<bool>) -> StoreResult<()> {
        sqlx::query(
            "UPDATE public.maestros SET nombre = $2, apellido = $3, email = $4, especialidad = $5, telefono = $6, fecha_contratacion = $7, activo = COALESCE($8, activo) WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.surname)
        .bind(&draft.email)
        .bind(&draft.specialty)
        .bind(&draft.phone)
        .bind(draft.hired_on)
        .bind(active)
        .execute(self.pool())
        .await
        .map_err(|source| StoreError::from_write(source, &draft.email))?;
        Ok(())
    }

    async fn deactivate(&self, id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE public.maestros SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .context(MakeQuerySnafu)?;
        Ok(())
    }
}
