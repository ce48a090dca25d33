//! Two-view navigation: the landing page at "/" and the 3D scene at "/Art".

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Art,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Home, Route::Art];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Art => "/Art",
        }
    }

    /// Text of the menu-bar link
    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Art => "Art",
        }
    }

    /// Resolves a path, ignoring case and one trailing slash
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NotFound(String),
}

/// Holds the active route
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Switches to the route matching `path`. Unknown paths keep the current route.
    pub fn navigate(&mut self, path: &str) -> Result<Route, RouteError> {
        let route = Route::from_path(path).ok_or_else(|| RouteError::NotFound(path.to_string()))?;
        self.go(route);
        Ok(route)
    }

    pub fn go(&mut self, route: Route) {
        if route != self.current {
            log::info!("Navigating {} -> {}", self.current, route);
            self.current = route;
        }
    }
}
