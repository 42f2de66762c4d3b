use crate::{
    data::{Record, student::Student, teacher::Teacher},
    error::{ClientError, ClientResult, ErrorBody, RequestSnafu},
    shell::state::{ShellCollection, ShellState, View},
};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use snafu::ResultExt;

/// Thin wrapper over the REST surface.
#[derive(Clone, Debug)]
pub struct AcademicaClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Acknowledgement {
    ok: bool,
}

impl AcademicaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url<R: Record>(&self) -> String {
        format!("{}/api/{}", self.base_url, R::PLURAL)
    }

    fn item_url<R: Record>(&self, id: i64) -> String {
        format!("{}/api/{}/{id}", self.base_url, R::PLURAL)
    }

    pub async fn list<R: Record>(&self) -> ClientResult<Vec<R>> {
        let response = self
            .http
            .get(self.collection_url::<R>())
            .send()
            .await
            .context(RequestSnafu {
                action: "list",
                noun: R::PLURAL,
            })?;
        decode(response, "list", R::PLURAL).await
    }

    pub async fn fetch<R: Record>(&self, id: i64) -> ClientResult<R> {
        let response = self
            .http
            .get(self.item_url::<R>(id))
            .send()
            .await
            .context(RequestSnafu {
                action: "fetch",
                noun: R::SINGULAR,
            })?;
        decode(response, "fetch", R::SINGULAR).await
    }

    pub async fn create<R: Record>(&self, form: &R::Form) -> ClientResult<R> {
        let response = self
            .http
            .post(self.collection_url::<R>())
            .json(form)
            .send()
            .await
            .context(RequestSnafu {
                action: "create",
                noun: R::SINGULAR,
            })?;
        decode(response, "create", R::SINGULAR).await
    }

    pub async fn update<R: Record>(&self, id: i64, form: &R::Form) -> ClientResult<R> {
        let response = self
            .http
            .put(self.item_url::<R>(id))
            .json(form)
            .send()
            .await
            .context(RequestSnafu {
                action: "update",
                noun: R::SINGULAR,
            })?;
        decode(response, "update", R::SINGULAR).await
    }

    /// Returns the server's `ok` flag.
    pub async fn delete<R: Record>(&self, id: i64) -> ClientResult<bool> {
        let response = self
            .http
            .delete(self.item_url::<R>(id))
            .send()
            .await
            .context(RequestSnafu {
                action: "delete",
                noun: R::SINGULAR,
            })?;
        let Acknowledgement { ok } = decode(response, "delete", R::SINGULAR).await?;
        Ok(ok)
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    action: &'static str,
    noun: &'static str,
) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context(RequestSnafu { action, noun });
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error }) => error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(ClientError::Rejected {
        status,
        message,
        action,
        noun,
    })
}

/// The presentation shell: both collections loaded once, then kept in step with each
/// successful mutation. Failed calls are logged and leave local state untouched.
#[derive(Debug)]
pub struct Shell {
    client: AcademicaClient,
    state: ShellState,
}

impl Shell {
    /// Loads both collections. A collection that fails to load starts empty.
    pub async fn load(client: AcademicaClient) -> Self {
        let (students, teachers) = tokio::join!(client.list::<Student>(), client.list::<Teacher>());

        let students = students.unwrap_or_else(|e| {
            warn!(?e, "Failed to load estudiantes");
            Vec::new()
        });
        let teachers = teachers.unwrap_or_else(|e| {
            warn!(?e, "Failed to load maestros");
            Vec::new()
        });

        Self {
            client,
            state: ShellState::new(students, teachers),
        }
    }

    pub const fn state(&self) -> &ShellState {
        &self.state
    }

    pub const fn switch_to(&mut self, view: View) {
        self.state.switch_to(view);
    }

    pub async fn submit_create<R: ShellCollection>(&mut self, form: &R::Form) -> ClientResult<R> {
        let created = self
            .client
            .create::<R>(form)
            .await
            .inspect_err(|e| warn!(?e, noun = R::SINGULAR, "Failed to submit"))?;

        self.state.append(created.clone());
        Ok(created)
    }

    pub async fn submit_update<R: ShellCollection>(
        &mut self,
        id: i64,
        form: &R::Form,
    ) -> ClientResult<R> {
        let updated = self
            .client
            .update::<R>(id, form)
            .await
            .inspect_err(|e| warn!(?e, noun = R::SINGULAR, id, "Failed to submit"))?;

        if !self.state.replace(updated.clone()) {
            debug!(noun = R::SINGULAR, id, "Updated a record not held locally");
        }
        Ok(updated)
    }

    pub async fn delete<R: ShellCollection>(&mut self, id: i64) -> ClientResult<()> {
        let ok = self
            .client
            .delete::<R>(id)
            .await
            .inspect_err(|e| warn!(?e, noun = R::SINGULAR, id, "Failed to delete"))?;

        if ok {
            self.state.remove::<R>(id);
        }
        Ok(())
    }
}
