//! Document-grounded question answering: ingest files into a Supabase vector
//! table with Gemini embeddings, answer questions from the retrieved chunks,
//! then have a second Gemini persona audit each answer.

pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod indexer;
pub mod models;
pub mod progress;
pub mod rag;

pub use config::Settings;
pub use error::{Error, Result};
