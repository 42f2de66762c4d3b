use crate::{
    data::{student::Student, teacher::Teacher},
    error::{AcademicaResult, StoreSnafu},
    maud_conveniences::{mailto, render_table, search_box, subtitle, title},
    shell::state::{ShellCollection, search},
    state::AcademicaState,
};
use axum::extract::{Query, State};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt;

pub const COLUMNS: usize = 5;

/// How a record kind is laid out in its list view.
pub trait RosterPage: ShellCollection {
    const HEADING: &'static str;
    const BLURB: &'static str;
    const SEARCH_PLACEHOLDER: &'static str;
    const EMPTY: &'static str;
    const TITLES: [&'static str; COLUMNS];

    fn row(&self) -> [Markup; COLUMNS];
}

fn full_name(first_name: &str, surname: &str) -> Markup {
    html! { span class="font-medium" { (first_name) " " (surname) } }
}

fn optional(value: Option<impl maud::Render>) -> Markup {
    html! {
        @if let Some(value) = value {
            (value)
        } @else {
            span class="italic text-gray-500" {"N/A"}
        }
    }
}

impl RosterPage for Student {
    const HEADING: &'static str = "Estudiantes";
    const BLURB: &'static str = "Gestiona los estudiantes registrados";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar estudiantes...";
    const EMPTY: &'static str = "No se encontraron estudiantes";
    const TITLES: [&'static str; COLUMNS] = ["Nombre", "Email", "Edad", "Grado", "Fecha Ingreso"];

    fn row(&self) -> [Markup; COLUMNS] {
        [
            full_name(&self.first_name, &self.surname),
            mailto(&self.email),
            optional(self.age),
            optional(self.grade.as_deref()),
            html! { (self.enrolled_on.format("%Y-%m-%d").to_string()) },
        ]
    }
}

impl RosterPage for Teacher {
    const HEADING: &'static str = "Maestros";
    const BLURB: &'static str = "Gestiona el personal docente";
    const SEARCH_PLACEHOLDER: &'static str = "Buscar maestros...";
    const EMPTY: &'static str = "No se encontraron maestros";
    const TITLES: [&'static str; COLUMNS] = [
        "Nombre",
        "Email",
        "Especialidad",
        "Teléfono",
        "Fecha Contratación",
    ];

    fn row(&self) -> [Markup; COLUMNS] {
        [
            full_name(&self.first_name, &self.surname),
            mailto(&self.email),
            optional(self.specialty.as_deref()),
            optional(self.phone.as_deref()),
            html! { (self.hired_on.format("%Y-%m-%d").to_string()) },
        ]
    }
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn render_roster<R: RosterPage>(records: &[R], query: &str) -> Markup {
    let rows = search(records, query).map(R::row).collect();

    html! {
        (title(R::HEADING))
        (subtitle(R::BLURB))
        (search_box(R::VIEW.href(), R::SEARCH_PLACEHOLDER, query))
        div id="roster" {
            (render_table(R::TITLES, rows, R::EMPTY))
        }
    }
}

pub async fn get_roster_page<R: RosterPage>(
    State(state): State<AcademicaState>,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> AcademicaResult<Markup> {
    let records = R::roster(&state)
        .list_active()
        .await
        .context(StoreSnafu {
            action: "list",
            noun: R::PLURAL,
        })?;

    Ok(state.render(R::VIEW, render_roster(&records, &q)))
}
