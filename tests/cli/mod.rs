/// End-to-end CLI tests that exercise the actual binary with assert_cmd
pub mod commands;
