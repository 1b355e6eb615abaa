pub mod appointment;
pub mod catalog;
