//! Integration test entry point.
//!
//! All DB-backed tests connect to `TEST_DATABASE_URL` and skip (with a note
//! on stderr) when it is not set, so the suite passes without local
//! infrastructure.

mod common;

mod activity_note_tests;
mod gamification_tests;
