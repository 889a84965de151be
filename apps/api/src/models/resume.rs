//! The structured résumé returned to the preview UI.
//!
//! Field names follow the JSON contract (`personalDetails`, `techStack`, ...).
//! Deserialization is strict about shape: every section must be present and typed
//! correctly. `null` in a string slot is read as an empty string since models emit it
//! for unknown values.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_details: PersonalDetails,
    #[serde(deserialize_with = "null_as_empty")]
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub portfolio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub duration: String,
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

impl ResumeDocument {
    /// Checks the entries the preview cannot render sensibly.
    /// Returns one message per offending entry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        for (i, e) in self.experience.iter().enumerate() {
            if is_blank(&e.role) && is_blank(&e.company) {
                problems.push(format!("experience[{i}] has neither role nor company"));
            }
        }
        for (i, e) in self.education.iter().enumerate() {
            if is_blank(&e.degree) && is_blank(&e.institution) {
                problems.push(format!("education[{i}] has neither degree nor institution"));
            }
        }
        for (i, p) in self.projects.iter().enumerate() {
            if is_blank(&p.name) {
                problems.push(format!("projects[{i}] has no name"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
