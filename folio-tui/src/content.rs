//! Portfolio content rendered by the document view.
//!
//! A default profile ships embedded in the binary; `profile_path` in the
//! configuration points at a YAML file with the same shape to replace it.
use folio_common::{FolioError, Result};
use serde::Deserialize;
use std::path::Path;

const BUILTIN_PROFILE: &str = include_str!("../assets/profile.yaml");

/// Unknown labels deserialize to [`Proficiency::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Proficiency {
    Executive,
    Expert,
    Advanced,
    Proficient,
    Other,
}

impl From<String> for Proficiency {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "executive" => Proficiency::Executive,
            "expert" => Proficiency::Expert,
            "advanced" => Proficiency::Advanced,
            "proficient" => Proficiency::Proficient,
            _ => Proficiency::Other,
        }
    }
}

impl Proficiency {
    pub fn label(self) -> &'static str {
        match self {
            Proficiency::Executive => "Executive",
            Proficiency::Expert => "Expert",
            Proficiency::Advanced => "Advanced",
            Proficiency::Proficient => "Proficient",
            Proficiency::Other => "Familiar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub greeting: String,
    pub headline: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub location: String,
    pub email: String,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub links: Vec<SocialLink>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub about: About,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub contact_blurb: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct About {
    pub intro: String,
    pub journey: Vec<String>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Achievement {
    pub title: String,
    #[serde(default)]
    pub badge: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Skill {
    pub name: String,
    pub proficiency: Proficiency,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    pub period: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub challenge: String,
    pub solution: String,
    pub result: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl Profile {
    /// The profile embedded at build time.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_PROFILE)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let profile: Profile = serde_yaml::from_str(yaml)
            .map_err(|e| FolioError::Content(format!("profile yaml: {e}")))?;
        profile.check()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
            .map_err(|e| FolioError::Content(format!("{}: {e}", path.display())))
    }

    /// Link whose name matches `name`, ignoring case.
    pub fn link(&self, name: &str) -> Option<&SocialLink> {
        self.links.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn skill_count(&self) -> usize {
        self.skills.iter().map(|c| c.skills.len()).sum()
    }

    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FolioError::Content("profile name must not be empty".into()));
        }
        if self.email.trim().is_empty() {
            return Err(FolioError::Content("profile email must not be empty".into()));
        }
        Ok(())
    }
}
