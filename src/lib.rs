mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{cli, handlers, repositories, routes, ui};
pub use infrastructure::{http, utils};

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use entities::common::PageDto;
use errors::AppError;
use http::query::QueryClient;
use repositories::knitting::HttpKnittingRepo;
use ui::{ViewContext, ViewTimings};
use use_cases::{
    create::KnittingCreateController, list::KnittingListController,
    update::KnittingUpdateController,
};

pub type AppListController = KnittingListController<HttpKnittingRepo>;
pub type AppCreateController = KnittingCreateController<HttpKnittingRepo>;
pub type AppUpdateController = KnittingUpdateController<HttpKnittingRepo>;

/// Shared wiring of a session: the backend repository and the UI ports
/// every view is built with.
pub struct AppState {
    pub config: settings::AppConfig,
    pub repo: Arc<HttpKnittingRepo>,
    pub ctx: ViewContext,
    /// Cancelled when the session ends; controllers tear down on it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: settings::AppConfig,
        notifier: Arc<dyn ui::Notifier>,
        navigator: Arc<dyn ui::Navigator>,
        confirmer: Arc<dyn ui::Confirmer>,
    ) -> Result<Self, AppError> {
        let repo = HttpKnittingRepo::new(QueryClient::new(&config)?);
        let timings = ViewTimings::from(&config);

        Ok(AppState {
            repo: Arc::new(repo),
            ctx: ViewContext::new(notifier, navigator, confirmer, timings),
            shutdown: CancellationToken::new(),
            config,
        })
    }

    pub fn list_controller(&self, params: PageDto) -> AppListController {
        KnittingListController::new(Arc::clone(&self.repo), self.ctx.clone(), params)
            .with_cancellation(self.shutdown.child_token())
    }

    pub fn create_controller(&self, today: NaiveDate) -> AppCreateController {
        KnittingCreateController::new(Arc::clone(&self.repo), self.ctx.clone(), today)
            .with_cancellation(self.shutdown.child_token())
    }

    pub fn update_controller(&self, id: i64, today: NaiveDate) -> AppUpdateController {
        KnittingUpdateController::new(Arc::clone(&self.repo), self.ctx.clone(), id, today)
            .with_cancellation(self.shutdown.child_token())
    }
}
