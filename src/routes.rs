use crate::{
    data::{student::Student, teacher::Teacher},
    routes::{
        api::{create_record, delete_record, get_record, list_records, update_record},
        index::get_index_route,
        rosters::{RosterPage, get_roster_page},
    },
    state::AcademicaState,
};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod extractors;
pub mod index;
pub mod rosters;
#[cfg(test)]
mod testing;

/// The list page plus the collection and item endpoints for one record kind.
fn entity_routes<R: RosterPage>(router: Router<AcademicaState>) -> Router<AcademicaState> {
    router
        .route(R::VIEW.href(), get(get_roster_page::<R>))
        .route(
            &format!("/api/{}", R::PLURAL),
            get(list_records::<R>).post(create_record::<R>),
        )
        .route(
            &format!("/api/{}/{{id}}", R::PLURAL),
            get(get_record::<R>)
                .put(update_record::<R>)
                .delete(delete_record::<R>),
        )
}

pub fn router(state: AcademicaState) -> Router {
    let router = Router::new().route("/", get(get_index_route));
    let router = entity_routes::<Student>(router);
    let router = entity_routes::<Teacher>(router);

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
