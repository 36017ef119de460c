use chrono::Local;

use crate::{
    cli::ShowCommand,
    entities::knitting_form::TEXT_RULES,
    use_cases::update::{ImageSlot, PatternFileSlot},
    use_cases::view_state::ViewState,
    AppState,
};

pub async fn show(state: &AppState, cmd: ShowCommand) -> anyhow::Result<()> {
    let controller = state.update_controller(cmd.id, Local::now().date_naive());
    if let ViewState::Failed(message) = controller.load().await {
        anyhow::bail!(message);
    }

    let form = controller.form();
    println!("#{}", cmd.id);
    for rule in TEXT_RULES.iter() {
        println!("{:<16} {}", rule.field.label(), form.fields.get(rule.field));
    }
    println!("{:<16} {}", "시작일", form.start_date());
    println!("{:<16} {}", "종료일", form.end_date().unwrap_or("-"));
    if !form.fields.contents.is_empty() {
        println!();
        println!("{}", form.fields.contents);
    }

    println!();
    print_slot("도안 사진", controller.pattern_image_slot());
    print_slot("실/바늘 사진", controller.yarn_needle_image_slot());
    match controller.pattern_file_slot() {
        PatternFileSlot::Existing(indicator) => println!("{:<16} {}", "도안", indicator),
        PatternFileSlot::Upload { .. } => println!("{:<16} -", "도안"),
    }
    for item in controller.gallery() {
        println!("{:<16} [{}] {}", "사진", item.target.id, item.preview_url);
    }
    Ok(())
}

fn print_slot(label: &str, slot: ImageSlot) {
    match slot {
        ImageSlot::Existing { target, preview_url } => {
            println!("{:<16} [{}] {}", label, target.id, preview_url)
        }
        ImageSlot::Upload { .. } => println!("{:<16} -", label),
    }
}
