pub mod parser;
pub mod repository;
