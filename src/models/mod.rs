pub mod adjustment;
pub mod audit;
pub mod cash;
pub mod client;
pub mod employee;
pub mod expense;
pub mod invoice;
pub mod job;
pub mod payment;
pub mod payroll;
pub mod value;
