//! Client-visible routes of the UI shell.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    StudentList,
    CreateStudent,
    StudentDetail(String),
    EditStudent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches `{0}`")]
pub struct UnknownRoute(pub String);

impl Route {
    pub fn parse(path: &str) -> Result<Self, UnknownRoute> {
        if !path.starts_with('/') {
            return Err(UnknownRoute(path.to_string()));
        }
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] | [""] => Ok(Route::StudentList),
            ["students", "create"] => Ok(Route::CreateStudent),
            ["students", id] if !id.is_empty() => Ok(Route::StudentDetail(id.to_string())),
            ["students", id, "edit"] if !id.is_empty() => Ok(Route::EditStudent(id.to_string())),
            _ => Err(UnknownRoute(path.to_string())),
        }
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::StudentList => write!(f, "/"),
            Route::CreateStudent => write!(f, "/students/create"),
            Route::StudentDetail(id) => write!(f, "/students/{id}"),
            Route::EditStudent(id) => write!(f, "/students/{id}/edit"),
        }
    }
}
