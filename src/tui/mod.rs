pub mod input;
pub mod lights;
pub mod view;
