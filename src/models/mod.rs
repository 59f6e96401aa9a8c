pub mod ai_analysis;
pub mod content;
pub mod profile;
pub mod resume;
pub mod resume_stat;
