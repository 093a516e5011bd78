//! Live incremental find-and-highlight for a text view.
//!
//! A [`search::FindAction`] compiles the query as the user types, highlights
//! every match, marks their lines in the overview gutter and lets the user
//! step between them. The bundled `find-rus` binary hosts one document in the
//! terminal and drives the action from the keyboard.

pub mod config;
pub mod controller;
pub mod document_model;
pub mod history;
pub mod keymap;
pub mod prompt;
pub mod search;
pub mod status;
pub mod view;
