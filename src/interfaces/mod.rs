pub mod console;
pub mod view;
