use crate::{
    cli::ListCommand,
    constants::DEFAULT_PAGE,
    entities::common::PageDto,
    use_cases::list::ListView,
    AppState,
};

pub async fn list(state: &AppState, cmd: ListCommand) -> anyhow::Result<()> {
    let params = PageDto::new(
        cmd.page.unwrap_or(DEFAULT_PAGE),
        cmd.size.unwrap_or(state.config.page_size),
    );
    let controller = state.list_controller(params);
    controller.fetch().await;

    match controller.view() {
        ListView::Loading => {}
        ListView::Failed(message) => anyhow::bail!(message),
        ListView::Empty(placeholder) => println!("{}", placeholder),
        ListView::Rows { rows, pagination } => {
            println!(
                "{:>4}  {:<30} {:<16} {:<10} {:<10} {:<10}",
                "No.", "도안이름/크기", "실", "바늘", "시작일", "종료일"
            );
            for row in rows {
                println!(
                    "{:>4}  {:<30} {:<16} {:<10} {:<10} {:<10}  (#{})",
                    row.number,
                    row.pattern_name_size,
                    row.yarn,
                    row.needles,
                    row.start_date,
                    row.end_date,
                    row.id
                );
            }
            println!("page {}/{}", pagination.page, pagination.total_pages);
        }
    }
    Ok(())
}
