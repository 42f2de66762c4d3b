use crate::{
    error::{AcademicaResult, InvalidDateSnafu, MissingRequiredFieldsSnafu, StoreResult},
    state::AcademicaState,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use snafu::{ResultExt, ensure};
use std::fmt::Debug;

pub mod memory;
pub mod postgres;
pub mod student;
pub mod teacher;

/// One of the roster entities. Both share a shape: a generated id, required names and
/// email, a required date, two optional attributes and the `activo` flag.
pub trait Record:
    Serialize + DeserializeOwned + Clone + Debug + Send + Sync + Unpin + 'static
{
    /// Every column except `id` and `activo`.
    type Draft: Clone + Debug + Send + Sync + 'static;
    /// The request body for create and update. Every field is optional so missing fields
    /// can be reported together.
    type Form: Serialize + DeserializeOwned + Debug + Send + Sync + 'static;

    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> i64;
    fn email(&self) -> &str;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn from_draft(id: i64, draft: Self::Draft, active: bool) -> Self;

    fn validate(form: Self::Form) -> AcademicaResult<Submission<Self::Draft>>;

    fn roster(state: &AcademicaState) -> &dyn Roster<Self>;
}

/// A validated request body.
#[derive(Debug, Clone)]
pub struct Submission<D> {
    pub draft: D,
    /// `None` when the body left `activo` out.
    pub active: Option<bool>,
}

/// Storage for one entity table. Reads by id ignore `activo`; only `list_active` filters.
#[async_trait]
pub trait Roster<R: Record>: Debug + Send + Sync {
    /// Active rows, newest first.
    async fn list_active(&self) -> StoreResult<Vec<R>>;
    async fn get_by_id(&self, id: i64) -> StoreResult<Option<R>>;
    /// Inserts an active row and returns its generated id.
    async fn insert(&self, draft: R::Draft) -> StoreResult<i64>;
    /// Overwrites every column of row `id`. `active: None` keeps the stored flag.
    /// Unknown ids are not an error here; callers notice on read-back.
    async fn replace(&self, id: i64, draft: R::Draft, active: Option<bool>) -> StoreResult<()>;
    async fn deactivate(&self, id: i64) -> StoreResult<()>;
}

/// Collects missing required fields so they can all be reported in one error.
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub fn finish(self) -> AcademicaResult<()> {
        ensure!(
            self.missing.is_empty(),
            MissingRequiredFieldsSnafu {
                fields: self.missing
            }
        );
        Ok(())
    }
}

pub(crate) fn parse_date(field: &'static str, original: String) -> AcademicaResult<NaiveDate> {
    NaiveDate::parse_from_str(original.trim(), "%Y-%m-%d")
        .context(InvalidDateSnafu { field, original })
}

/// Blank optional text is stored as NULL rather than as an empty string.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
