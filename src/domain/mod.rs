pub mod mix;
pub mod track;
