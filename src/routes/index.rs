use crate::{
    data::{Record, student::Student, teacher::Teacher},
    error::StoreResult,
    maud_conveniences::{stat_card, subtitle, title},
    shell::state::{DashboardSummary, ShellState, View},
    state::AcademicaState,
};
use axum::extract::State;
use chrono::{Datelike, Local};
use maud::{Markup, html};

fn or_empty<R>(listed: StoreResult<Vec<R>>, noun: &'static str) -> Vec<R> {
    listed.unwrap_or_else(|e| {
        warn!(?e, noun, "Failed to list, showing none");
        Vec::new()
    })
}

/// Loads both active collections. One that fails is logged and left empty so the
/// other still renders.
pub async fn load_shell_state(state: &AcademicaState) -> ShellState {
    let (students, teachers) = tokio::join!(
        state.students().list_active(),
        state.teachers().list_active()
    );

    ShellState::new(
        or_empty(students, Student::PLURAL),
        or_empty(teachers, Teacher::PLURAL),
    )
}

pub fn render_dashboard(summary: DashboardSummary, school_year: i32) -> Markup {
    html! {
        (title("Dashboard"))
        (subtitle("Resumen del sistema académico"))

        div class="grid gap-4 md:grid-cols-2 lg:grid-cols-4" {
            (stat_card("Total Estudiantes", summary.students, "Estudiantes activos"))
            (stat_card("Total Maestros", summary.teachers, "Personal docente"))
            (stat_card("Ratio Estudiante/Maestro", summary.ratio_display(), "Estudiantes por maestro"))
            (stat_card("Año Escolar", school_year, "Ciclo actual"))
        }
    }
}

pub async fn get_index_route(State(state): State<AcademicaState>) -> Markup {
    let shell = load_shell_state(&state).await;

    state.render(
        View::Dashboard,
        render_dashboard(shell.summary(), Local::now().year()),
    )
}
