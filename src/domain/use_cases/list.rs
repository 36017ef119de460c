use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    constants::EMPTY_LIST_MESSAGE,
    entities::{
        common::{PageDto, PaginationEx},
        knitting::KnittingListRes,
    },
    errors::AppError,
    http::{cancellable, loading::LoadingFlag},
    repositories::knitting::KnittingRepository,
    routes::Route,
    ui::ViewContext,
    use_cases::view_state::ViewState,
};

pub type KnittingPage = PaginationEx<KnittingListRes>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub number: u64,
    pub id: i64,
    pub pattern_name_size: String,
    pub yarn: String,
    pub needles: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
}

/// What the list view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Failed(String),
    /// A single placeholder row in place of the table body.
    Empty(&'static str),
    Rows {
        rows: Vec<ListRow>,
        pagination: PaginationView,
    },
}

/// Paginated project list.
pub struct KnittingListController<R>
where
    R: KnittingRepository,
{
    repo: Arc<R>,
    ctx: ViewContext,
    params: Mutex<PageDto>,
    state: Mutex<ViewState<KnittingPage>>,
    generation: AtomicU64,
    loading: LoadingFlag,
    cancel: CancellationToken,
}

impl<R> KnittingListController<R>
where
    R: KnittingRepository,
{
    pub fn new(repo: Arc<R>, ctx: ViewContext, params: PageDto) -> Self {
        KnittingListController {
            repo,
            ctx,
            params: Mutex::new(params),
            state: Mutex::new(ViewState::Idle),
            generation: AtomicU64::new(0),
            loading: LoadingFlag::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Ties the controller to an outer token, e.g. the session's shutdown.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn params(&self) -> PageDto {
        *self.params.lock()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn state(&self) -> ViewState<KnittingPage> {
        self.state.lock().clone()
    }

    /// Fetches the page for the current parameters. When several fetches
    /// overlap only the most recently issued one may update the state.
    pub async fn fetch(&self) -> ViewState<KnittingPage> {
        let params = self.params();
        if let Err(e) = params.validate() {
            let state = ViewState::Failed(AppError::from(e).to_string());
            *self.state.lock() = state.clone();
            return state;
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let _guard = self.loading.begin_shared();
        *self.state.lock() = ViewState::Loading;

        let result = cancellable(&self.cancel, self.repo.list(params)).await;

        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(page = params.page, "discarding superseded list response");
            return self.state();
        }

        let next = match result {
            Ok(page) => ViewState::Loaded(page),
            Err(AppError::Cancelled) => ViewState::Idle,
            Err(e) => {
                tracing::warn!(page = params.page, size = params.size, "list fetch failed: {}", e);
                ViewState::Failed(e.to_string())
            }
        };
        *self.state.lock() = next.clone();
        next
    }

    /// Page selection from the pagination control: records the navigation
    /// and refetches with the new page, keeping the size.
    pub async fn on_page_change(&self, page: u32) -> ViewState<KnittingPage> {
        let params = {
            let mut params = self.params.lock();
            *params = params.with_page(page);
            *params
        };
        self.ctx.navigator.push(Route::List {
            page: params.page,
            size: params.size,
        });
        self.fetch().await
    }

    pub fn on_project_click(&self, id: i64) {
        self.ctx.navigator.push(Route::Update { id });
    }

    pub fn on_create_click(&self) {
        self.ctx.navigator.push(Route::Create);
    }

    pub fn view(&self) -> ListView {
        match &*self.state.lock() {
            ViewState::Idle | ViewState::Loading => ListView::Loading,
            ViewState::Failed(message) => ListView::Failed(message.clone()),
            ViewState::Loaded(page) if page.is_empty() => ListView::Empty(EMPTY_LIST_MESSAGE),
            ViewState::Loaded(page) => ListView::Rows {
                rows: rows(page),
                pagination: PaginationView {
                    page: page.page,
                    total_pages: page.total_pages,
                },
            },
        }
    }

    /// Cancels any pending fetch.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

fn rows(page: &KnittingPage) -> Vec<ListRow> {
    page.contents
        .iter()
        .enumerate()
        .map(|(index, item)| ListRow {
            number: page.row_number(index),
            id: item.id,
            pattern_name_size: item.pattern_name_size.clone(),
            yarn: item.yarn.clone(),
            needles: item.needles.clone(),
            start_date: item.start_date.clone(),
            end_date: item.end_date.clone().unwrap_or_default(),
        })
        .collect()
}
