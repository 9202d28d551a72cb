pub mod course;
pub mod dependency;
pub mod identity;
pub mod query_course;
pub mod transfer;
