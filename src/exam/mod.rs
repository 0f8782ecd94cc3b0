// Exam assembly: concatenates question fragments into per-category documents.

pub mod assembler;

pub use assembler::{assemble_category, assemble_exam, copy_single_question, ExamOptions};
