/// Render state of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// The last fetch failed; kept apart from `Loading` so a view can say so.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }
}
