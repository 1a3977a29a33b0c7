//! Router and state for the headcount web server, exposed as a library
//! so integration tests can drive the routes with stub pipelines.

pub mod app;
