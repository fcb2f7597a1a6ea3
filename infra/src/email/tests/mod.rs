//! Tests for the email module

mod brevo_tests;
mod create_dispatcher_tests;
mod dispatcher_tests;
