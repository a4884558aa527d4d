//! Export surfaces built on top of the OOXML engine

pub mod questions;

pub use questions::{answer_grid, build_paper, generate_paper, PaperOptions, QuestionRecord};
