pub mod ai_dto;
pub mod export_dto;
pub mod profile_dto;
pub mod resume_dto;
pub mod share_dto;
pub mod stats_dto;
