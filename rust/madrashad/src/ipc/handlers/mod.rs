pub mod allocation;
pub mod core;
pub mod dashboard;
pub mod records;
pub mod rooms;
pub mod staff;
pub mod students;
pub mod wardens;
