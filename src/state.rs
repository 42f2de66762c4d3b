use crate::{
    config::RuntimeConfiguration,
    data::{Roster, postgres::PgRoster, student::Student, teacher::Teacher},
    error::{AcademicaResult, MigrateSnafu, OpenDatabaseSnafu},
    maud_conveniences::render_sidebar,
    shell::state::View,
};
use maud::{DOCTYPE, Markup, html};
use snafu::ResultExt;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::sync::Arc;

/// Process-wide state shared by every handler. Storage sits behind [`Roster`] trait
/// objects so tests can swap in [`crate::data::memory::MemoryRoster`].
#[derive(Clone, Debug)]
pub struct AcademicaState {
    students: Arc<dyn Roster<Student>>,
    teachers: Arc<dyn Roster<Teacher>>,
    pool: Option<Pool<Postgres>>,
}

impl AcademicaState {
    pub async fn new(options: PgPoolOptions, config: &RuntimeConfiguration) -> AcademicaResult<Self> {
        let connect_options = config.db_config().connect_options()?;
        let pool = options
            .connect_with(connect_options)
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        let roster = Arc::new(PgRoster::new(pool.clone()));

        Ok(Self {
            students: roster.clone(),
            teachers: roster,
            pool: Some(pool),
        })
    }

    pub fn with_roster<S>(roster: Arc<S>) -> Self
    where
        S: Roster<Student> + Roster<Teacher> + 'static,
    {
        Self {
            students: roster.clone(),
            teachers: roster,
            pool: None,
        }
    }

    pub fn students(&self) -> &dyn Roster<Student> {
        self.students.as_ref()
    }

    pub fn teachers(&self) -> &dyn Roster<Teacher> {
        self.teachers.as_ref()
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, view: View, markup: Markup) -> Markup {
        let sidebar = render_sidebar(view);

        html! {
            (DOCTYPE)
            html lang="es" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Academica - " (view.label()) }
                }
                body class="bg-gray-900 min-h-screen flex text-white" {
                    (sidebar)
                    main class="flex-1 p-6 lg:p-8" {
                        (markup)
                    }
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        if let Some(pool) = &self.pool {
            info!("Closing database pool");
            pool.close().await;
        }
    }
}
