use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::resume::Template;

/// Typed view over the `content_json` document. Every field is optional; the
/// stored blob stays opaque so unknown keys survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<Education>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience: Vec<Experience>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

impl ResumeContent {
    /// Checks that a raw document has the editor's shape. Returns the typed
    /// view so callers can render it.
    pub fn from_value(value: &JsonValue) -> Result<Self, String> {
        if !value.is_object() {
            return Err("content_json must be a JSON object".to_string());
        }
        serde_json::from_value(value.clone()).map_err(|e| format!("Invalid content_json: {}", e))
    }

    /// Sample document a freshly created resume starts with.
    pub fn sample_for(template: Template) -> Self {
        let s = |v: &str| Some(v.to_string());
        let list = |items: &[&str]| items.iter().map(|i| i.to_string()).collect::<Vec<_>>();

        match template {
            Template::Classic => ResumeContent {
                personal: Some(PersonalInfo {
                    full_name: s("Alex Morgan"),
                    title: s("Product Manager"),
                    phone: s("555-0100"),
                    email: s("user@example.com"),
                    linkedin: s("linkedin.com/in/user"),
                    portfolio: s("user.dev"),
                }),
                summary: s("Senior product manager experienced in cross-functional delivery and data-driven decisions."),
                education: vec![Education {
                    school: s("State University"),
                    degree: s("MBA"),
                    year: s("2018"),
                }],
                experience: vec![Experience {
                    company: s("Acme Corp"),
                    role: s("Product Manager"),
                    from: s("2019"),
                    to: s("Present"),
                    highlights: list(&["Owned the core product roadmap", "Grew revenue by 20%"]),
                }],
                projects: vec![Project {
                    name: s("SaaS platform revamp"),
                    description: s("Improved retention and conversion"),
                    highlights: list(&["A/B testing program", "User research and discovery"]),
                }],
                skills: list(&["Product planning", "Data analysis", "Project management"]),
                certificates: list(&["PMP"]),
            },
            Template::Creative => ResumeContent {
                personal: Some(PersonalInfo {
                    full_name: s("Jordan Lee"),
                    title: s("UI/UX Designer"),
                    phone: s("555-0101"),
                    email: s("designer@example.com"),
                    linkedin: s("linkedin.com/in/designer"),
                    portfolio: s("designer.art"),
                }),
                summary: s("Designer focused on user experience, high-fidelity prototyping and motion design."),
                education: vec![Education {
                    school: s("Art Institute"),
                    degree: s("BA, Design"),
                    year: s("2017"),
                }],
                experience: vec![Experience {
                    company: s("Studio North"),
                    role: s("Senior Designer"),
                    from: s("2020"),
                    to: s("Present"),
                    highlights: list(&["Rebuilt the brand identity", "Lifted conversion by 15%"]),
                }],
                projects: vec![Project {
                    name: s("Mobile redesign"),
                    description: s("Unified design system"),
                    highlights: list(&["Component guidelines", "Motion principles"]),
                }],
                skills: list(&["Figma", "Motion", "Design systems"]),
                certificates: list(&["Adobe Certified Professional"]),
            },
            Template::Modern => ResumeContent {
                personal: Some(PersonalInfo {
                    full_name: s("Sam Taylor"),
                    title: s("Frontend Engineer"),
                    phone: s("555-0102"),
                    email: s("fe@example.com"),
                    linkedin: s("linkedin.com/in/fe"),
                    portfolio: s("fe.codes"),
                }),
                summary: s("Frontend engineer focused on performance and tooling with broad architecture experience."),
                education: vec![Education {
                    school: s("Tech University"),
                    degree: s("BSc, Computer Science"),
                    year: s("2016"),
                }],
                experience: vec![Experience {
                    company: s("Webworks"),
                    role: s("Senior Frontend Engineer"),
                    from: s("2019"),
                    to: s("Present"),
                    highlights: list(&["Led performance work, LCP under 2s", "Built the component library"]),
                }],
                projects: vec![Project {
                    name: s("Component library"),
                    description: s("Consistent UI and interaction patterns"),
                    highlights: list(&["Accessibility support", "Responsive layouts"]),
                }],
                skills: list(&["React", "TypeScript", "Performance"]),
                certificates: list(&["Frontend Engineering Practice"]),
            },
        }
    }

    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_else(|_| JsonValue::Object(Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_documents() {
        assert!(ResumeContent::from_value(&json!(["a"])).is_err());
        assert!(ResumeContent::from_value(&json!("text")).is_err());
    }

    #[test]
    fn rejects_wrongly_typed_sections() {
        let err = ResumeContent::from_value(&json!({ "skills": "rust" })).unwrap_err();
        assert!(err.starts_with("Invalid content_json"));
    }

    #[test]
    fn accepts_partial_documents_and_ignores_unknown_keys() {
        let content = ResumeContent::from_value(&json!({
            "summary": "Hello",
            "experience": [{ "company": "Acme" }],
            "custom_section": { "anything": true }
        }))
        .unwrap();
        assert_eq!(content.summary.as_deref(), Some("Hello"));
        assert_eq!(content.experience[0].company.as_deref(), Some("Acme"));
        assert!(content.personal.is_none());
    }

    #[test]
    fn every_template_has_a_populated_sample() {
        for t in [Template::Modern, Template::Classic, Template::Creative] {
            let sample = ResumeContent::sample_for(t);
            assert!(sample.personal.is_some());
            assert!(!sample.experience.is_empty());
            assert!(sample.to_value().is_object());
        }
    }
}
