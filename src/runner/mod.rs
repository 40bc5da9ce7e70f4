//! Task runner for benchmark evaluation.
//!
//! # Architecture
//!
//! ```text
//! Problem → GenerationClient → response → JudgeRegistry → Verdict → ResultRecord
//!                                                                       ↓
//!                                                                  TaskSummary
//! ```
//!
//! Problems run strictly sequentially with an optional pause after each one.
//! A generation that fails after all retries becomes an incorrect record
//! carrying the error; it never aborts the task.

pub mod executor;
pub mod result;

pub use executor::TaskRunner;
pub use result::{success_rate, ResultRecord, TaskSummary};
