pub mod ai;
pub mod docs;
pub mod export;
pub mod extract;
pub mod health;
pub mod profile;
pub mod render;
pub mod resumes;
pub mod share;
pub mod stats;
