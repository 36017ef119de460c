//! One handler per command of the `knitting_diary` binary. Each drives the
//! matching view controller and prints what the view would render.

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    cli::{Command, FieldArgs, FileArgs},
    entities::{form_file::FormFile, knitting_form::FormField},
    errors::AppError,
    use_cases::submission::SubmitOutcome,
    AppCreateController, AppState, AppUpdateController,
};

/// Runs one command against the session.
pub async fn dispatch(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(cmd) => list::list(state, cmd).await,
        Command::Show(cmd) => show::show(state, cmd).await,
        Command::Create(cmd) => create::create(state, cmd).await,
        Command::Update(cmd) => update::update(state, cmd).await,
        Command::Delete(cmd) => delete::delete(state, cmd).await,
        Command::DeleteImage(cmd) => delete::delete_image(state, cmd).await,
    }
}

/// What the create and update forms accept from the command line.
#[async_trait]
trait FormInput: Sync {
    fn set_field(&self, field: FormField, value: &str);
    fn set_contents(&self, value: &str);
    fn select_start_date(&self, date: NaiveDate);
    fn select_end_date(&self, date: Option<NaiveDate>);
    async fn choose_pattern_image(&self, file: FormFile) -> Result<(), AppError>;
    async fn choose_yarn_needle_image(&self, file: FormFile) -> Result<(), AppError>;
    fn choose_pattern_file(&self, file: FormFile) -> Result<(), AppError>;
    fn choose_pictures(&self, files: Vec<FormFile>) -> Result<(), AppError>;
}

macro_rules! impl_form_input {
    ($controller:ty) => {
        #[async_trait]
        impl FormInput for $controller {
            fn set_field(&self, field: FormField, value: &str) {
                <$controller>::set_field(self, field, value);
            }
            fn set_contents(&self, value: &str) {
                <$controller>::set_contents(self, value);
            }
            fn select_start_date(&self, date: NaiveDate) {
                <$controller>::select_start_date(self, Some(date));
            }
            fn select_end_date(&self, date: Option<NaiveDate>) {
                <$controller>::select_end_date(self, date);
            }
            async fn choose_pattern_image(&self, file: FormFile) -> Result<(), AppError> {
                <$controller>::choose_pattern_image(self, Some(file)).await
            }
            async fn choose_yarn_needle_image(&self, file: FormFile) -> Result<(), AppError> {
                <$controller>::choose_yarn_needle_image(self, Some(file)).await
            }
            fn choose_pattern_file(&self, file: FormFile) -> Result<(), AppError> {
                <$controller>::choose_pattern_file(self, file)
            }
            fn choose_pictures(&self, files: Vec<FormFile>) -> Result<(), AppError> {
                <$controller>::choose_pictures(self, files)
            }
        }
    };
}

impl_form_input!(AppCreateController);
impl_form_input!(AppUpdateController);

fn apply_fields(form: &impl FormInput, fields: &FieldArgs) {
    for (field, value) in fields.text_patches() {
        form.set_field(field, value);
    }
    if let Some(contents) = &fields.contents {
        form.set_contents(contents);
    }
    if let Some(start) = fields.start_date {
        form.select_start_date(start);
    }
    if fields.end_date.is_some() || fields.clear_end_date {
        form.select_end_date(fields.end_date);
    }
}

async fn apply_files(form: &impl FormInput, files: &FileArgs) -> Result<(), AppError> {
    if let Some(path) = &files.pattern_image {
        form.choose_pattern_image(FormFile::from_path(path).await?).await?;
    }
    if let Some(path) = &files.yarn_needle_image {
        form.choose_yarn_needle_image(FormFile::from_path(path).await?).await?;
    }
    if let Some(path) = &files.pattern_file {
        form.choose_pattern_file(FormFile::from_path(path).await?)?;
    }
    if !files.pictures.is_empty() {
        let mut pictures = Vec::with_capacity(files.pictures.len());
        for path in &files.pictures {
            pictures.push(FormFile::from_path(path).await?);
        }
        form.choose_pictures(pictures)?;
    }
    Ok(())
}

/// Maps a submission result to the process outcome. Notifications were
/// already shown by the controller.
fn finish_submit(outcome: SubmitOutcome) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Submitted => Ok(()),
        SubmitOutcome::Declined => {
            tracing::info!("submission declined");
            Ok(())
        }
        SubmitOutcome::Invalid(violation) => {
            anyhow::bail!("{} is invalid: {}", violation.field, violation.message)
        }
        SubmitOutcome::Cancelled => anyhow::bail!(AppError::Cancelled),
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}
