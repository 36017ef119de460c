pub mod create;
pub mod list;
pub mod long_press;
pub mod submission;
pub mod update;
pub mod view_state;
