pub mod title;

pub use title::{compare_title, normalize_title};
