//! Unit tests for individual components

mod audit_test;
mod builders_test;
mod config_test;
mod directory_test;
mod error_test;
mod ledger_test;
mod mailbox_test;
mod protocol_test;
mod report_test;
mod util_test;
