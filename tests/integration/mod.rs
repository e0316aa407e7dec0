//! Integration tests for the check resource

mod helpers;
mod test_cli;
