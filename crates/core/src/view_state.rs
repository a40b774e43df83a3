//! Tagged view state consumed by list/detail screens.

use coinboard_market_data::ApiError;

/// What a screen should currently render.
///
/// Exactly one variant is active at a time. The list state machine never
/// constructs `Loaded` with an empty collection - an empty successful result
/// becomes `Empty` instead.
#[derive(Clone, Debug)]
pub enum ViewState<T> {
    /// Nothing has happened yet.
    Idle,
    /// A base load is in flight.
    Loading,
    /// Content is available.
    Loaded(T),
    /// The load succeeded but produced nothing to show.
    Empty,
    /// The load failed in a user-visible way.
    Error(ApiError),
}

impl<T> ViewState<T> {
    /// The loaded content, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Whether a base load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure, if the state is `Error`.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Short tag for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Empty => "empty",
            Self::Error(_) => "error",
        }
    }
}
