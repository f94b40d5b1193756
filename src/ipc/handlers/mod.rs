pub mod backup_exchange;
pub mod classes;
pub mod core;
pub mod roster;
pub mod students;
