pub mod course;
pub mod dependency;
pub mod owner;

pub use course as courses;
pub use dependency as dependencies;
pub use owner as owners;
