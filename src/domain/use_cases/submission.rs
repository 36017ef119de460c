use std::{future::Future, sync::Arc};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    entities::{
        common::EmptyDto,
        knitting_form::{FieldViolation, KnittingForm},
    },
    errors::AppError,
    http::{
        cancellable,
        loading::LoadingFlag,
        upload::{ProgressCallback, UploadProgress},
    },
    ui::ViewContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Indeterminate indicator, used when no file is sent.
    #[default]
    Spinner,
    /// Percentage bar driven by upload progress.
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub open: bool,
    pub mode: ProgressMode,
    pub percent: u8,
}

/// Shared progress indicator of a form view.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<Mutex<ProgressState>>);

impl ProgressHandle {
    pub fn snapshot(&self) -> ProgressState {
        *self.0.lock()
    }

    /// Opens the indicator for a submission of `form`, returning the
    /// callback that drives the bar when files are sent.
    fn open_for(&self, form: &KnittingForm) -> Option<ProgressCallback> {
        let has_files = form.has_files();
        *self.0.lock() = ProgressState {
            open: has_files,
            mode: if has_files { ProgressMode::Percent } else { ProgressMode::Spinner },
            percent: 0,
        };

        if !has_files {
            return None;
        }
        let state = Arc::clone(&self.0);
        Some(Arc::new(move |progress: UploadProgress| {
            if let Some(percent) = progress.percent() {
                let mut state = state.lock();
                state.percent = state.percent.max(percent);
                tracing::debug!(percent, "upload progress");
            }
        }))
    }

    fn close(&self) {
        self.0.lock().open = false;
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// A field rule failed; nothing was sent.
    Invalid(FieldViolation),
    /// The user did not confirm.
    Declined,
    Submitted,
    /// The view was torn down while the request was pending.
    Cancelled,
    Failed(AppError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Validate, confirm, send and report: the submit workflow shared by the
/// create and update views.
#[derive(Debug, Default)]
pub struct FormSubmission {
    progress: ProgressHandle,
    loading: LoadingFlag,
}

impl FormSubmission {
    pub fn progress(&self) -> ProgressState {
        self.progress.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub async fn submit<F, Fut>(
        &self,
        ctx: &ViewContext,
        cancel: &CancellationToken,
        form: KnittingForm,
        confirm_prompt: &str,
        send: F,
    ) -> Result<SubmitOutcome, AppError>
    where
        F: FnOnce(KnittingForm, Option<ProgressCallback>) -> Fut,
        Fut: Future<Output = Result<EmptyDto, AppError>>,
    {
        if let Some(violation) = form.first_violation() {
            ctx.notify_error(&violation.message).await;
            return Ok(SubmitOutcome::Invalid(violation));
        }

        if !ctx.confirmer.confirm(confirm_prompt).await {
            return Ok(SubmitOutcome::Declined);
        }

        let guard = self.loading.begin()?;
        let on_progress = self.progress.open_for(&form);
        let result = cancellable(cancel, send(form, on_progress)).await;
        self.progress.close();
        drop(guard);

        match result {
            Ok(_) => Ok(SubmitOutcome::Submitted),
            Err(AppError::Cancelled) => Ok(SubmitOutcome::Cancelled),
            Err(err) => {
                report_error(ctx, &err).await;
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }
}

/// Shows the server message for the recognized error kinds and logs the
/// rest.
pub async fn report_error(ctx: &ViewContext, err: &AppError) {
    match err.as_error_res() {
        Some(res) if res.error_code.is_user_facing() => ctx.notify_error(&res.message).await,
        Some(res) => tracing::error!("Not implemented error code: {}", res.error_code),
        None => tracing::error!("Request failed: {}", err),
    }
}
