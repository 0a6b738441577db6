//! Text processing and scoring module

pub mod document;
pub mod text_processor;
pub mod skills;
pub mod similarity;
pub mod ranking;
pub mod screener;
