pub mod config;
pub mod deploy;
pub mod logger;
pub mod post;
pub mod prompt;
pub mod sanitizer;
pub mod text_utils;
pub mod word_counter;
mod test_data;
