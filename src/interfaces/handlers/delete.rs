use chrono::Local;

use crate::{
    cli::{DeleteCommand, DeleteImageCommand},
    entities::picture::SubResource,
    use_cases::{update::DeleteOutcome, view_state::ViewState},
    AppState,
};

pub async fn delete(state: &AppState, cmd: DeleteCommand) -> anyhow::Result<()> {
    let controller = state.update_controller(cmd.id, Local::now().date_naive());
    finish_delete(controller.delete().await?)
}

/// Deletes one image after checking that the record actually has it.
pub async fn delete_image(state: &AppState, cmd: DeleteImageCommand) -> anyhow::Result<()> {
    let controller = state.update_controller(cmd.record_id, Local::now().date_naive());
    if let ViewState::Failed(message) = controller.load().await {
        anyhow::bail!(message);
    }

    let target = SubResource::new(cmd.kind.into(), cmd.image_id);
    let owned = controller.pattern_image_slot().target() == Some(target)
        || controller.yarn_needle_image_slot().target() == Some(target)
        || controller.gallery().iter().any(|item| item.target == target);
    if !owned {
        anyhow::bail!("knitting #{} has no image {}", cmd.record_id, target);
    }

    finish_delete(controller.delete_sub_resource(target).await?)
}

fn finish_delete(outcome: DeleteOutcome) -> anyhow::Result<()> {
    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Declined => {
            tracing::info!("delete declined");
            Ok(())
        }
        DeleteOutcome::Cancelled => anyhow::bail!("delete cancelled"),
        DeleteOutcome::Failed(e) => Err(e.into()),
    }
}
