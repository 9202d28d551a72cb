pub mod course;
pub mod department;
pub mod error;
pub mod graph;
pub mod source_type;
pub mod transfer;
pub mod visibility;
