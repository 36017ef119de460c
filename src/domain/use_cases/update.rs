use std::{sync::Arc, time::Instant};

use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    constants::{DELETE_CONFIRM, DELETE_SUCCESS, PATTERN_FILE_PRESENT, UPDATE_CONFIRM, UPDATE_SUCCESS},
    entities::{
        form_file::{FileAccept, FormFile},
        knitting::KnittingInfoRes,
        knitting_form::{FormField, KnittingForm},
        picture::{SubResource, SubResourceKind},
    },
    errors::AppError,
    http::{cancellable, loading::LoadingFlag},
    repositories::knitting::KnittingRepository,
    ui::ViewContext,
    use_cases::{
        create::ImagePreviews,
        long_press::LongPress,
        submission::{report_error, FormSubmission, ProgressState, SubmitOutcome},
        view_state::ViewState,
    },
};

/// One single-image slot of the update view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    /// Already stored on the server: read-only, deletable by long press.
    Existing { target: SubResource, preview_url: String },
    /// No server image: an upload control with the local preview, if any.
    Upload { preview: Option<String> },
}

impl ImageSlot {
    pub fn target(&self) -> Option<SubResource> {
        match self {
            ImageSlot::Existing { target, .. } => Some(*target),
            ImageSlot::Upload { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternFileSlot {
    /// Indicator text for a pattern file already on the server.
    Existing(&'static str),
    Upload { chosen: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub target: SubResource,
    pub preview_url: String,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Cancelled,
    Failed(AppError),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Edit view of one stored project, including deletion of the project and
/// of its images.
pub struct KnittingUpdateController<R>
where
    R: KnittingRepository,
{
    repo: Arc<R>,
    ctx: ViewContext,
    id: i64,
    form: Mutex<KnittingForm>,
    record: Mutex<ViewState<KnittingInfoRes>>,
    previews: Mutex<ImagePreviews>,
    submission: FormSubmission,
    fetching: LoadingFlag,
    deleting: LoadingFlag,
    cancel: CancellationToken,
}

impl<R> KnittingUpdateController<R>
where
    R: KnittingRepository + 'static,
{
    pub fn new(repo: Arc<R>, ctx: ViewContext, id: i64, today: NaiveDate) -> Self {
        KnittingUpdateController {
            repo,
            ctx,
            id,
            form: Mutex::new(KnittingForm::for_record(id, today)),
            record: Mutex::new(ViewState::Idle),
            previews: Mutex::new(ImagePreviews::default()),
            submission: FormSubmission::default(),
            fetching: LoadingFlag::new(),
            deleting: LoadingFlag::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Ties the controller to an outer token, e.g. the session's shutdown.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn form(&self) -> KnittingForm {
        self.form.lock().clone()
    }

    pub fn record(&self) -> ViewState<KnittingInfoRes> {
        self.record.lock().clone()
    }

    pub fn progress(&self) -> ProgressState {
        self.submission.progress()
    }

    pub fn is_loading(&self) -> bool {
        self.fetching.is_loading() || self.submission.is_loading() || self.deleting.is_loading()
    }

    /// Fetches the record and resets the form from it. Also used to reload
    /// the view after a successful mutation.
    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub async fn load(&self) -> ViewState<KnittingInfoRes> {
        if self.id <= 0 {
            let state = ViewState::Failed(AppError::NotFound(format!("knitting #{}", self.id)).to_string());
            *self.record.lock() = state.clone();
            return state;
        }

        let _guard = self.fetching.begin_shared();
        {
            let mut record = self.record.lock();
            if record.data().is_none() {
                *record = ViewState::Loading;
            }
        }

        let next = match cancellable(&self.cancel, self.repo.info(self.id)).await {
            Ok(info) => {
                self.form.lock().reset_from(&info);
                *self.previews.lock() = ImagePreviews::default();
                ViewState::Loaded(info)
            }
            Err(AppError::Cancelled) => {
                let mut record = self.record.lock();
                if record.is_loading() {
                    *record = ViewState::Idle;
                }
                return record.clone();
            }
            Err(e) => {
                tracing::warn!("knitting info fetch failed: {}", e);
                ViewState::Failed(e.to_string())
            }
        };
        *self.record.lock() = next.clone();
        next
    }

    // ───── Slots ─────────────────────────────────────────────────────

    fn existing(&self, kind: SubResourceKind) -> Option<SubResource> {
        let record = self.record.lock();
        let info = record.data()?;
        let id = match kind {
            SubResourceKind::PatternImage => info.pattern_image?.id,
            SubResourceKind::YarnNeedleImage => info.yarn_needle_image?.id,
            SubResourceKind::Picture => return None,
        };
        Some(SubResource::new(kind, id))
    }

    fn image_slot(&self, kind: SubResourceKind, preview: Option<String>) -> ImageSlot {
        match self.existing(kind) {
            Some(target) => ImageSlot::Existing {
                target,
                preview_url: self.repo.preview_url(target),
            },
            None => ImageSlot::Upload { preview },
        }
    }

    pub fn pattern_image_slot(&self) -> ImageSlot {
        let preview = self.previews.lock().pattern_image.clone();
        self.image_slot(SubResourceKind::PatternImage, preview)
    }

    pub fn yarn_needle_image_slot(&self) -> ImageSlot {
        let preview = self.previews.lock().yarn_needle_image.clone();
        self.image_slot(SubResourceKind::YarnNeedleImage, preview)
    }

    pub fn pattern_file_slot(&self) -> PatternFileSlot {
        let has_file = self
            .record
            .lock()
            .data()
            .is_some_and(|info| info.pattern_file.is_some());
        if has_file {
            return PatternFileSlot::Existing(PATTERN_FILE_PRESENT);
        }
        let chosen = self
            .form
            .lock()
            .attachments
            .pattern_file
            .as_ref()
            .map(|file| file.file_name.clone());
        PatternFileSlot::Upload { chosen }
    }

    /// Pictures already stored for the record.
    pub fn gallery(&self) -> Vec<GalleryItem> {
        let pictures = match self.record.lock().data() {
            Some(info) => info.pictures.clone(),
            None => return Vec::new(),
        };
        pictures
            .into_iter()
            .map(|picture| {
                let target = SubResource::new(SubResourceKind::Picture, picture.id);
                GalleryItem {
                    target,
                    preview_url: self.repo.preview_url(target),
                }
            })
            .collect()
    }

    // ───── Editing ───────────────────────────────────────────────────

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.form.lock().set_field(field, value);
    }

    pub fn set_contents(&self, value: impl Into<String>) {
        self.form.lock().set_contents(value);
    }

    pub fn select_start_date(&self, date: Option<NaiveDate>) {
        self.form.lock().select_start_date(date);
    }

    pub fn select_end_date(&self, date: Option<NaiveDate>) {
        self.form.lock().select_end_date(date);
    }

    fn ensure_slot_free(&self, kind: SubResourceKind) -> Result<(), AppError> {
        match self.existing(kind) {
            Some(target) => Err(AppError::InvalidFile(format!(
                "{} already exists; delete it before uploading another",
                target
            ))),
            None => Ok(()),
        }
    }

    pub async fn choose_pattern_image(&self, file: Option<FormFile>) -> Result<(), AppError> {
        self.ensure_slot_free(SubResourceKind::PatternImage)?;
        let Some(file) = file else {
            self.previews.lock().pattern_image = None;
            return Ok(());
        };
        file.ensure_accepted(FileAccept::Image)?;
        let preview = file.preview_data_url().await?;
        self.form.lock().set_pattern_image(file)?;
        self.previews.lock().pattern_image = Some(preview);
        Ok(())
    }

    pub async fn choose_yarn_needle_image(&self, file: Option<FormFile>) -> Result<(), AppError> {
        self.ensure_slot_free(SubResourceKind::YarnNeedleImage)?;
        let Some(file) = file else {
            self.previews.lock().yarn_needle_image = None;
            return Ok(());
        };
        file.ensure_accepted(FileAccept::Image)?;
        let preview = file.preview_data_url().await?;
        self.form.lock().set_yarn_needle_image(file)?;
        self.previews.lock().yarn_needle_image = Some(preview);
        Ok(())
    }

    pub fn choose_pattern_file(&self, file: FormFile) -> Result<(), AppError> {
        if matches!(self.pattern_file_slot(), PatternFileSlot::Existing(_)) {
            return Err(AppError::InvalidFile(format!(
                "a pattern file is already stored for knitting #{}",
                self.id
            )));
        }
        self.form.lock().set_pattern_file(file)
    }

    /// New pictures are added next to the stored ones.
    pub fn choose_pictures(&self, files: Vec<FormFile>) -> Result<(), AppError> {
        self.form.lock().set_pictures(files)
    }

    // ───── Actions ───────────────────────────────────────────────────

    /// Submits every text field and the newly chosen files, then reloads.
    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub async fn submit(&self) -> Result<SubmitOutcome, AppError> {
        if self.record.lock().data().is_none() {
            return Err(AppError::NotFound(format!("knitting #{} is not loaded", self.id)));
        }

        let form = self.form();
        let repo = Arc::clone(&self.repo);
        let outcome = self
            .submission
            .submit(&self.ctx, &self.cancel, form, UPDATE_CONFIRM, |form, on_progress| async move {
                repo.update(&form, on_progress).await
            })
            .await?;

        if outcome.is_submitted() {
            tracing::info!("knitting project updated");
            self.ctx.notify_success(UPDATE_SUCCESS).await;
            self.load().await;
        }
        Ok(outcome)
    }

    /// Starts a press on `target`; the returned gesture only ever deletes
    /// that image.
    pub fn press(&self, target: SubResource, at: Instant) -> LongPress {
        LongPress::start(target, self.ctx.timings.long_press_threshold, at)
    }

    /// Ends a press. A press held at least the threshold asks to delete its
    /// image; a shorter one does nothing.
    pub async fn on_long_press(
        &self,
        press: LongPress,
        released_at: Instant,
    ) -> Result<Option<DeleteOutcome>, AppError> {
        match press.release(released_at) {
            Some(target) => self.delete_sub_resource(target).await.map(Some),
            None => {
                tracing::debug!(image = %press.target(), held = ?press.held_for(released_at), "press too short");
                Ok(None)
            }
        }
    }

    /// Deletes one image of the record after confirmation, then reloads.
    #[tracing::instrument(skip(self, target), fields(id = self.id, image = %target))]
    pub async fn delete_sub_resource(&self, target: SubResource) -> Result<DeleteOutcome, AppError> {
        if !self.ctx.confirmer.confirm(target.kind.delete_confirm()).await {
            return Ok(DeleteOutcome::Declined);
        }

        let guard = self.deleting.begin()?;
        let result = cancellable(&self.cancel, self.repo.delete_sub_resource(target)).await;
        drop(guard);

        match result {
            Ok(_) => {
                tracing::info!("image deleted");
                self.ctx.notify_success(DELETE_SUCCESS).await;
                self.load().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(AppError::Cancelled) => Ok(DeleteOutcome::Cancelled),
            Err(e) => {
                tracing::warn!("image delete failed: {}", e);
                Ok(DeleteOutcome::Failed(e))
            }
        }
    }

    /// Deletes the whole record after confirmation and navigates back.
    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub async fn delete(&self) -> Result<DeleteOutcome, AppError> {
        if !self.ctx.confirmer.confirm(DELETE_CONFIRM).await {
            return Ok(DeleteOutcome::Declined);
        }

        let guard = self.deleting.begin()?;
        let result = cancellable(&self.cancel, self.repo.delete(self.id)).await;
        drop(guard);

        match result {
            Ok(_) => {
                tracing::info!("knitting project deleted");
                self.ctx.notify_success(DELETE_SUCCESS).await;
                self.ctx.navigator.back();
                Ok(DeleteOutcome::Deleted)
            }
            Err(AppError::Cancelled) => Ok(DeleteOutcome::Cancelled),
            Err(e) => {
                report_error(&self.ctx, &e).await;
                Ok(DeleteOutcome::Failed(e))
            }
        }
    }

    pub fn on_cancel_click(&self) {
        self.ctx.navigator.back();
    }

    /// Cancels whatever request is pending.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}
