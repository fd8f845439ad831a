use std::{error, fmt};

use model::course::Course;

pub mod resolver;
pub mod session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The route payload contained no points; interpolation is undefined.
    EmptyRoute,
}

impl error::Error for RouteError {}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::EmptyRoute => write!(f, "route polyline has no points"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Route(RouteError),
    /// The requested course filter is not offered by this broadcast.
    CourseNotOffered(Course),
}

impl error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Route(why) => write!(f, "{}", why),
            SessionError::CourseNotOffered(course) => {
                write!(f, "course {} is not offered by this broadcast", course)
            }
        }
    }
}

impl From<RouteError> for SessionError {
    fn from(why: RouteError) -> Self {
        SessionError::Route(why)
    }
}
