use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    constants::{CREATE_CONFIRM, CREATE_SUCCESS},
    entities::{
        form_file::{FileAccept, FormFile},
        knitting_form::{FormField, KnittingForm},
    },
    errors::AppError,
    repositories::knitting::KnittingRepository,
    ui::ViewContext,
    use_cases::submission::{FormSubmission, ProgressState, SubmitOutcome},
};

/// Data-URL previews of the chosen images, shown before upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePreviews {
    pub pattern_image: Option<String>,
    pub yarn_needle_image: Option<String>,
}

/// The new-project form.
pub struct KnittingCreateController<R>
where
    R: KnittingRepository,
{
    repo: Arc<R>,
    ctx: ViewContext,
    form: Mutex<KnittingForm>,
    previews: Mutex<ImagePreviews>,
    submission: FormSubmission,
    cancel: CancellationToken,
}

impl<R> KnittingCreateController<R>
where
    R: KnittingRepository + 'static,
{
    /// The start date is preselected to `today`.
    pub fn new(repo: Arc<R>, ctx: ViewContext, today: NaiveDate) -> Self {
        KnittingCreateController {
            repo,
            ctx,
            form: Mutex::new(KnittingForm::new(today)),
            previews: Mutex::new(ImagePreviews::default()),
            submission: FormSubmission::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Ties the controller to an outer token, e.g. the session's shutdown.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn form(&self) -> KnittingForm {
        self.form.lock().clone()
    }

    pub fn previews(&self) -> ImagePreviews {
        self.previews.lock().clone()
    }

    pub fn progress(&self) -> ProgressState {
        self.submission.progress()
    }

    pub fn is_loading(&self) -> bool {
        self.submission.is_loading()
    }

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

    /// Stages the pattern photo and renders its preview. `None` keeps the
    /// staged file and clears the preview, like cancelling a file dialog.
    pub async fn choose_pattern_image(&self, file: Option<FormFile>) -> Result<(), AppError> {
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
        self.form.lock().set_pattern_file(file)
    }

    pub fn choose_pictures(&self, files: Vec<FormFile>) -> Result<(), AppError> {
        self.form.lock().set_pictures(files)
    }

    /// Validates, asks for confirmation and uploads. On success the user is
    /// told so and sent back to where they came from.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome, AppError> {
        let form = self.form();
        let repo = Arc::clone(&self.repo);
        let outcome = self
            .submission
            .submit(&self.ctx, &self.cancel, form, CREATE_CONFIRM, |form, on_progress| async move {
                repo.create(&form, on_progress).await
            })
            .await?;

        if outcome.is_submitted() {
            tracing::info!("knitting project created");
            self.ctx.notify_success(CREATE_SUCCESS).await;
            self.ctx.navigator.back();
        }
        Ok(outcome)
    }

    pub fn on_cancel_click(&self) {
        self.ctx.navigator.back();
    }

    /// Cancels a pending submission.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{common::EmptyDto, knitting_form::TEXT_RULES},
        errors::ErrorRes,
        repositories::knitting::MockKnittingRepository,
        settings::AppConfig,
        ui::{MockConfirmer, MockNavigator, MockNotifier, NotificationLevel, ViewTimings},
    };

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn ctx(notifier: MockNotifier, navigator: MockNavigator, confirmer: MockConfirmer) -> ViewContext {
        ViewContext::new(
            Arc::new(notifier),
            Arc::new(navigator),
            Arc::new(confirmer),
            ViewTimings::from(&AppConfig::default()),
        )
    }

    fn confirming() -> MockConfirmer {
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().returning(|_| true);
        confirmer
    }

    fn fill<R: KnittingRepository + 'static>(controller: &KnittingCreateController<R>) {
        for rule in TEXT_RULES.iter() {
            controller.set_field(rule.field, "x");
        }
    }

    #[tokio::test]
    async fn blank_name_blocks_submission() {
        let mut repo = MockKnittingRepository::new();
        repo.expect_create().never();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|n| n.level == NotificationLevel::Error && n.message == "도안이름/크기를 입력해 주세요.")
            .times(1)
            .return_const(());
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().never();

        let controller = KnittingCreateController::new(
            Arc::new(repo),
            ctx(notifier, MockNavigator::new(), confirmer),
            today(),
        );
        fill(&controller);
        controller.set_field(FormField::PatternNameSize, "   ");

        let outcome = controller.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let mut repo = MockKnittingRepository::new();
        repo.expect_create().never();
        let mut confirmer = MockConfirmer::new();
        confirmer
            .expect_confirm()
            .withf(|prompt| prompt == CREATE_CONFIRM)
            .times(1)
            .returning(|_| false);

        let controller = KnittingCreateController::new(
            Arc::new(repo),
            ctx(MockNotifier::new(), MockNavigator::new(), confirmer),
            today(),
        );
        fill(&controller);

        assert!(matches!(controller.submit().await.unwrap(), SubmitOutcome::Declined));
    }

    #[tokio::test]
    async fn success_notifies_then_goes_back() {
        let mut repo = MockKnittingRepository::new();
        repo.expect_create()
            .withf(|form, progress| form.id.is_none() && progress.is_none())
            .times(1)
            .returning(|_, _| Ok(EmptyDto {}));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|n| n.level == NotificationLevel::Success && n.message == CREATE_SUCCESS)
            .times(1)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_back().times(1).return_const(());

        let controller = KnittingCreateController::new(
            Arc::new(repo),
            ctx(notifier, navigator, confirming()),
            today(),
        );
        fill(&controller);

        assert!(controller.submit().await.unwrap().is_submitted());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn unknown_error_code_is_only_logged() {
        let mut repo = MockKnittingRepository::new();
        repo.expect_create()
            .returning(|_, _| Err(AppError::Api(ErrorRes::new("SOMETHING_ELSE", "boom"))));
        let mut notifier = MockNotifier::new();
        notifier.expect_show().never();
        let mut navigator = MockNavigator::new();
        navigator.expect_back().never();

        let controller = KnittingCreateController::new(
            Arc::new(repo),
            ctx(notifier, navigator, confirming()),
            today(),
        );
        fill(&controller);
        controller
            .choose_pattern_file(FormFile::from_bytes("p.pdf", b"%PDF-1.4".to_vec()))
            .unwrap();

        let outcome = controller.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(!controller.progress().open);
    }

    #[tokio::test]
    async fn upload_size_error_is_shown_once() {
        let mut repo = MockKnittingRepository::new();
        repo.expect_create().returning(|_, _| {
            Err(AppError::Api(ErrorRes::new("UPLOAD_SIZE_ERROR", "파일 크기가 너무 큽니다.")))
        });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_show()
            .withf(|n| n.level == NotificationLevel::Error && n.message == "파일 크기가 너무 큽니다.")
            .times(1)
            .return_const(());

        let controller = KnittingCreateController::new(
            Arc::new(repo),
            ctx(notifier, MockNavigator::new(), confirming()),
            today(),
        );
        fill(&controller);

        assert!(matches!(controller.submit().await.unwrap(), SubmitOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn choosing_an_image_renders_a_preview() {
        let controller = KnittingCreateController::new(
            Arc::new(MockKnittingRepository::new()),
            ctx(MockNotifier::new(), MockNavigator::new(), MockConfirmer::new()),
            today(),
        );

        controller
            .choose_pattern_image(Some(FormFile::from_bytes("a.png", PNG.to_vec())))
            .await
            .unwrap();
        let preview = controller.previews().pattern_image.unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
        assert!(controller.form().attachments.pattern_image_file.is_some());

        controller.choose_pattern_image(None).await.unwrap();
        assert_eq!(controller.previews().pattern_image, None);
    }

    #[tokio::test]
    async fn pdf_is_refused_as_an_image() {
        let controller = KnittingCreateController::new(
            Arc::new(MockKnittingRepository::new()),
            ctx(MockNotifier::new(), MockNavigator::new(), MockConfirmer::new()),
            today(),
        );

        let err = controller
            .choose_yarn_needle_image(Some(FormFile::from_bytes("p.pdf", b"%PDF-1.4".to_vec())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFile(_)));
        assert_eq!(controller.previews().yarn_needle_image, None);
    }

    #[tokio::test]
    async fn rejected_image_keeps_the_previous_preview() {
        let controller = KnittingCreateController::new(
            Arc::new(MockKnittingRepository::new()),
            ctx(MockNotifier::new(), MockNavigator::new(), MockConfirmer::new()),
            today(),
        );
        controller
            .choose_pattern_image(Some(FormFile::from_bytes("a.png", PNG.to_vec())))
            .await
            .unwrap();
        let before = controller.previews().pattern_image;

        let err = controller
            .choose_pattern_image(Some(FormFile::from_bytes("big.pdf", b"%PDF-1.4".repeat(4096))))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFile(_)));
        assert_eq!(controller.previews().pattern_image, before);
        let staged = controller.form().attachments.pattern_image_file.unwrap();
        assert_eq!(staged.file_name, "a.png");
    }
}
