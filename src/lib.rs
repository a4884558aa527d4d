//! Document-synthesis core of the quiz-bank web application.
//!
//! The web layer collects approved multiple-choice questions; this crate
//! turns them into downloadable .docx files. `ooxml` is the WordprocessingML
//! package engine, `export` the question-paper builder on top of it.

pub mod ooxml;
pub mod export;

pub use export::{build_paper, generate_paper, PaperOptions, QuestionRecord};
pub use ooxml::{CoreProperties, DocxError, Template, WordDocument};
