pub mod http;
pub mod utils;
