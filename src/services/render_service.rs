use crate::error::Result;
use crate::models::content::ResumeContent;
use crate::models::resume::{Resume, Template, DEFAULT_COLOR_THEME};
use crate::utils::markdown::render_markdown;
use crate::utils::validation::validate_color_theme;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tera::{Context, Tera};

const RESUME_TEMPLATE: &str = "resume.html";

/// Flattened, render-ready view of a resume. Missing fields become empty strings.
#[derive(Debug, Serialize)]
struct ResumeView {
    title: String,
    template: &'static str,
    color_theme: String,
    name: String,
    headline: String,
    contacts: Vec<String>,
    /// Pre-rendered markdown, already escaped.
    summary_html: String,
    experience: Vec<ExperienceView>,
    projects: Vec<ProjectView>,
    education: Vec<EducationView>,
    skills: Vec<String>,
    certificates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ExperienceView {
    role: String,
    company: String,
    period: String,
    highlights: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ProjectView {
    name: String,
    description: String,
    highlights: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EducationView {
    school: String,
    degree: String,
    year: String,
}

#[derive(Clone)]
pub struct RenderService {
    tera: Arc<Tera>,
}

impl RenderService {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(RESUME_TEMPLATE, include_str!("../../templates/resume.html"))?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Renders a resume as a standalone HTML page. Unparsable content renders as an empty document.
    pub fn render_resume(&self, resume: &Resume, content: &JsonValue) -> Result<String> {
        let content = ResumeContent::from_value(content).unwrap_or_else(|e| {
            tracing::warn!(resume_id = %resume.id, error = %e, "rendering resume with unreadable content");
            ResumeContent::default()
        });
        let view = build_view(resume, content);
        let context = Context::from_serialize(&view)?;
        Ok(self.tera.render(RESUME_TEMPLATE, &context)?)
    }
}

fn build_view(resume: &Resume, content: ResumeContent) -> ResumeView {
    let template = resume.template.parse::<Template>().unwrap_or_default();
    let color_theme = if validate_color_theme(&resume.color_theme).is_ok() {
        resume.color_theme.clone()
    } else {
        DEFAULT_COLOR_THEME.to_string()
    };

    let personal = content.personal.unwrap_or_default();
    let contacts = [
        personal.email,
        personal.phone,
        personal.linkedin,
        personal.portfolio,
    ]
    .into_iter()
    .flatten()
    .filter(|c| !c.trim().is_empty())
    .collect();

    ResumeView {
        title: resume.title.clone(),
        template: template.as_str(),
        color_theme,
        name: personal
            .full_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| resume.title.clone()),
        headline: personal.title.unwrap_or_default(),
        contacts,
        summary_html: content
            .summary
            .filter(|s| !s.trim().is_empty())
            .map(|s| render_markdown(&s))
            .unwrap_or_default(),
        experience: content
            .experience
            .into_iter()
            .map(|e| ExperienceView {
                role: e.role.unwrap_or_default(),
                company: e.company.unwrap_or_default(),
                period: match (e.from, e.to) {
                    (Some(from), Some(to)) => format!("{} – {}", from, to),
                    (Some(from), None) => from,
                    (None, Some(to)) => to,
                    (None, None) => String::new(),
                },
                highlights: e.highlights,
            })
            .collect(),
        projects: content
            .projects
            .into_iter()
            .map(|p| ProjectView {
                name: p.name.unwrap_or_default(),
                description: p.description.unwrap_or_default(),
                highlights: p.highlights,
            })
            .collect(),
        education: content
            .education
            .into_iter()
            .map(|e| EducationView {
                school: e.school.unwrap_or_default(),
                degree: e.degree.unwrap_or_default(),
                year: e.year.unwrap_or_default(),
            })
            .collect(),
        skills: content.skills,
        certificates: content.certificates,
    }
}
