pub mod common;
pub mod form_file;
pub mod knitting;
pub mod knitting_form;
pub mod picture;
