//! Integration tests across the full gateway stack.


mod auth;
mod end_to_end;
mod scenarios;
