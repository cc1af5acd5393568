use std::fmt;

/// Client-visible routes, one per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    UserPage,
    Orders,
    Payment,
    AdminPage,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::UserPage => "/user-page",
            Route::Orders => "/orders",
            Route::Payment => "/payment",
            Route::AdminPage => "/admin-page",
        }
    }

    /// Resolves a path; `/` redirects to the login view.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Route::Login),
            "/user-page" => Some(Route::UserPage),
            "/orders" => Some(Route::Orders),
            "/payment" => Some(Route::Payment),
            "/admin-page" => Some(Route::AdminPage),
            _ => None,
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
