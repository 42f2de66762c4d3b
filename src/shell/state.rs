use crate::data::{Record, student::Student, teacher::Teacher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Students,
    Teachers,
}

impl View {
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Students, Self::Teachers];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Students => "Estudiantes",
            Self::Teachers => "Maestros",
        }
    }

    pub const fn href(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Students => "/estudiantes",
            Self::Teachers => "/maestros",
        }
    }
}

/// A record kind the shell keeps a local collection of.
pub trait ShellCollection: Record {
    const VIEW: View;

    fn collection(state: &ShellState) -> &Vec<Self>;
    fn collection_mut(state: &mut ShellState) -> &mut Vec<Self>;
    /// The fields the list view's search box looks at.
    fn search_fields(&self) -> [Option<&str>; 3];

    /// Case-insensitive substring match on [`Self::search_fields`]. An empty query
    /// matches everything.
    fn matches_search(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.search_fields()
            .into_iter()
            .any(|field| field.unwrap_or_default().to_lowercase().contains(&needle))
    }
}

impl ShellCollection for Student {
    const VIEW: View = View::Students;

    fn collection(state: &ShellState) -> &Vec<Self> {
        &state.students
    }

    fn collection_mut(state: &mut ShellState) -> &mut Vec<Self> {
        &mut state.students
    }

    fn search_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.first_name.as_str()),
            Some(self.surname.as_str()),
            Some(self.email.as_str()),
        ]
    }
}

impl ShellCollection for Teacher {
    const VIEW: View = View::Teachers;

    fn collection(state: &ShellState) -> &Vec<Self> {
        &state.teachers
    }

    fn collection_mut(state: &mut ShellState) -> &mut Vec<Self> {
        &mut state.teachers
    }

    fn search_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.first_name.as_str()),
            Some(self.surname.as_str()),
            self.specialty.as_deref(),
        ]
    }
}

pub fn search<'a, R: ShellCollection>(records: &'a [R], query: &'a str) -> impl Iterator<Item = &'a R> {
    records.iter().filter(move |record| record.matches_search(query))
}

/// The client-side copy of both collections plus the selected view. Mutations are
/// reconciled locally by id instead of refetching, so concurrent writers elsewhere
/// are only seen on the next full load.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    view: View,
    students: Vec<Student>,
    teachers: Vec<Teacher>,
}

impl ShellState {
    pub const fn new(students: Vec<Student>, teachers: Vec<Teacher>) -> Self {
        Self {
            view: View::Dashboard,
            students,
            teachers,
        }
    }

    pub const fn view(&self) -> View {
        self.view
    }

    pub const fn switch_to(&mut self, view: View) {
        self.view = view;
    }

    pub fn records<R: ShellCollection>(&self) -> &[R] {
        R::collection(self)
    }

    pub fn search<'a, R: ShellCollection>(&'a self, query: &'a str) -> Vec<&'a R> {
        search(R::collection(self), query).collect()
    }

    pub fn append<R: ShellCollection>(&mut self, record: R) {
        R::collection_mut(self).push(record);
    }

    /// Returns whether a local record with that id existed.
    pub fn replace<R: ShellCollection>(&mut self, record: R) -> bool {
        match R::collection_mut(self)
            .iter_mut()
            .find(|existing| existing.id() == record.id())
        {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Returns whether anything was removed.
    pub fn remove<R: ShellCollection>(&mut self, id: i64) -> bool {
        let collection = R::collection_mut(self);
        let before = collection.len();
        collection.retain(|record| record.id() != id);
        collection.len() != before
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            students: self.students.len(),
            teachers: self.teachers.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub students: usize,
    pub teachers: usize,
}

impl DashboardSummary {
    /// Students per teacher to one decimal place, or `0` with no teachers.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio_display(&self) -> String {
        if self.teachers == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.students as f64 / self.teachers as f64)
        }
    }
}
