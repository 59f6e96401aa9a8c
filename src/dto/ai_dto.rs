use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[schema(value_type = Object)]
    pub resume_content: Option<JsonValue>,
    pub resume_id: Option<Uuid>,
    #[serde(default)]
    pub force_reanalyze: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JdMatchRequest {
    #[schema(value_type = Object)]
    pub resume_content: Option<JsonValue>,
    pub jd_text: Option<String>,
    pub resume_id: Option<Uuid>,
    #[serde(default)]
    pub force_reanalyze: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ScoreBreakdown {
    #[validate(range(min = 0.0, max = 100.0))]
    pub content_completeness: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub structure: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub expression: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompletenessFeedback {
    pub missing_sections: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StructureFeedback {
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpressionFeedback {
    pub rewrite_examples: Vec<String>,
}

/// Shape every resume analysis must have before it is cached or returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResumeAnalysis {
    #[validate(range(min = 0.0, max = 100.0))]
    pub overall_score: f64,
    #[validate(nested)]
    pub scores: ScoreBreakdown,
    pub content_completeness: CompletenessFeedback,
    pub structure: StructureFeedback,
    pub expression: ExpressionFeedback,
}

impl ResumeAnalysis {
    pub fn fallback() -> Self {
        Self {
            overall_score: 60.0,
            scores: ScoreBreakdown {
                content_completeness: 60.0,
                structure: 60.0,
                expression: 60.0,
            },
            content_completeness: CompletenessFeedback {
                missing_sections: vec![],
                recommendations: vec![
                    "Add measurable results to each experience entry.".into(),
                ],
            },
            structure: StructureFeedback {
                recommendations: vec![
                    "Order sections by relevance to the role you are targeting.".into(),
                ],
            },
            expression: ExpressionFeedback {
                rewrite_examples: vec![
                    "Start bullet points with strong action verbs.".into(),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct JdMatch {
    #[validate(range(min = 0.0, max = 100.0))]
    pub match_score: f64,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

impl JdMatch {
    pub fn fallback() -> Self {
        Self {
            match_score: 50.0,
            strengths: vec![],
            gaps: vec![],
            recommendations: vec![
                "Mirror the key skills from the job description in your summary.".into(),
            ],
        }
    }
}

/// Analysis result plus how it was produced. Flags are omitted when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope<T> {
    #[serde(flatten)]
    pub result: T,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_model: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_fallback: bool,
}

impl<T> AnalysisEnvelope<T> {
    pub fn fresh(result: T) -> Self {
        Self {
            result,
            is_cached: false,
            cached_at: None,
            cached_model: None,
            is_fallback: false,
        }
    }

    pub fn fallback(result: T) -> Self {
        Self {
            is_fallback: true,
            ..Self::fresh(result)
        }
    }
}
