pub mod account;
pub mod catalog;
pub mod challenge;
pub mod ranking;
pub mod school;
pub mod session;
pub mod student;
pub mod ticket;
pub mod work_log;
