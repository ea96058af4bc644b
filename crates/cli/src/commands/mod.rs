pub mod docs;
pub mod list;
pub mod simulate;
