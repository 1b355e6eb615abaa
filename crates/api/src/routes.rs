pub mod admin;
pub mod appointment;
pub mod availability;
pub mod health;
