//! Hive — ask a hosted Gemini model for writing and research help.
//!
//! DESIGN
//! ======
//! `controller` owns the single in-flight generation request and its
//! lifecycle state; `llm` is the Gemini adapter behind the
//! [`llm::GenerationClient`] trait; `view` is the terminal drawer that
//! renders state snapshots and forwards user input.

pub mod controller;
pub mod llm;
pub mod state;
pub mod view;
