pub mod contact;
pub mod memory_repo;
pub mod mongo_repo;
pub mod project;
