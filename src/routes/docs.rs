use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::dto::{
    ai_dto::{
        AnalyzeRequest, CompletenessFeedback, ExpressionFeedback, JdMatch, JdMatchRequest,
        ResumeAnalysis, ScoreBreakdown, StructureFeedback,
    },
    export_dto::HtmlToPdfPayload,
    profile_dto::{AvatarResponse, ProfileResponse, UpdateProfilePayload},
    resume_dto::{
        ContentVersionListResponse, ContentVersionResponse, CreateResumePayload, OkResponse,
        ResumeDetailResponse, ResumeListResponse, ResumeResponse, UpdateResumePayload,
    },
    share_dto::{CreateSharePayload, ShareResponse, SharedResumeResponse},
    stats_dto::{RecordStatPayload, StatListResponse},
};
use crate::models::{
    resume::{SharePermission, Template},
    resume_stat::ResumeStat,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::health,
        super::resumes::list_resumes,
        super::resumes::create_resume,
        super::resumes::get_resume,
        super::resumes::update_resume,
        super::resumes::delete_resume,
        super::resumes::list_versions,
        super::resumes::restore_version,
        super::resumes::list_resume_stats,
        super::share::create_share,
        super::share::get_shared,
        super::stats::record_stat,
        super::ai::analyze,
        super::ai::jd_match,
        super::export::export_pdf,
        super::export::export_html_as_pdf,
        super::profile::get_profile,
        super::profile::update_profile,
        super::profile::upload_avatar,
    ),
    components(schemas(
        Template,
        SharePermission,
        ResumeStat,
        CreateResumePayload,
        UpdateResumePayload,
        ResumeResponse,
        ResumeDetailResponse,
        ResumeListResponse,
        ContentVersionResponse,
        ContentVersionListResponse,
        OkResponse,
        CreateSharePayload,
        ShareResponse,
        SharedResumeResponse,
        RecordStatPayload,
        StatListResponse,
        AnalyzeRequest,
        JdMatchRequest,
        ScoreBreakdown,
        CompletenessFeedback,
        StructureFeedback,
        ExpressionFeedback,
        ResumeAnalysis,
        JdMatch,
        HtmlToPdfPayload,
        UpdateProfilePayload,
        ProfileResponse,
        AvatarResponse,
    )),
    tags((name = "resume-builder", description = "Resume builder backend"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
