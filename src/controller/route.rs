use crate::core::Filter;
use std::fmt;

/// Filter selected by the URL fragment. Unknown fragments show everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    All,
    Active,
    Completed,
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        match fragment {
            "#/active" => Route::Active,
            "#/completed" => Route::Completed,
            _ => Route::All,
        }
    }

    /// Suffix after `#/`, as highlighted by the filter links
    pub fn name(self) -> &'static str {
        match self {
            Route::All => "",
            Route::Active => "active",
            Route::Completed => "completed",
        }
    }

    pub fn fragment(self) -> &'static str {
        match self {
            Route::All => "#/",
            Route::Active => "#/active",
            Route::Completed => "#/completed",
        }
    }

    pub fn filter(self) -> Filter {
        match self {
            Route::All => Filter::All,
            Route::Active => Filter::Active,
            Route::Completed => Filter::Completed,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fragment())
    }
}
