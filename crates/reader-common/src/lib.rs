pub mod analyst;
pub mod book;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod openai;
pub mod prompt;
