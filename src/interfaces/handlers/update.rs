use chrono::Local;

use crate::{
    cli::UpdateCommand,
    handlers::{apply_fields, apply_files, finish_submit},
    use_cases::view_state::ViewState,
    AppState,
};

/// Loads the record, writes the given fields over it and submits the
/// whole form.
pub async fn update(state: &AppState, cmd: UpdateCommand) -> anyhow::Result<()> {
    let controller = state.update_controller(cmd.id, Local::now().date_naive());
    if let ViewState::Failed(message) = controller.load().await {
        anyhow::bail!(message);
    }

    apply_fields(&controller, &cmd.fields);
    apply_files(&controller, &cmd.files).await?;

    finish_submit(controller.submit().await?)
}
