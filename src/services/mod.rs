pub mod ai_service;
pub mod analysis_service;
pub mod pdf_service;
pub mod profile_service;
pub mod prompts;
pub mod render_service;
pub mod resume_service;
pub mod share_service;
pub mod stats_service;
pub mod storage_service;
