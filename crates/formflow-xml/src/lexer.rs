//! Low-level input scanning

pub mod cursor;
pub mod name;

pub use cursor::Cursor;
pub use name::{is_name_char, is_name_start_char, is_valid_name};
