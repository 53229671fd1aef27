pub mod files;
pub mod lock;
pub mod repo;
pub mod slots;
pub mod tasks;
