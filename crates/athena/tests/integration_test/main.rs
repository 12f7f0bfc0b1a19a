//! Integration tests for tlc-athena.
//!
//! Everything runs against `ScriptedQueryService`; no AWS credentials needed.

mod executor;
mod schema;
