use chrono::Local;

use crate::{
    cli::CreateCommand,
    handlers::{apply_fields, apply_files, finish_submit},
    AppState,
};

pub async fn create(state: &AppState, cmd: CreateCommand) -> anyhow::Result<()> {
    let controller = state.create_controller(Local::now().date_naive());
    apply_fields(&controller, &cmd.fields);
    apply_files(&controller, &cmd.files).await?;

    finish_submit(controller.submit().await?)
}
