use serde::{Deserialize, Serialize};

use super::{dedupe_case_insensitive, lenient_string, lenient_strings, lenient_u32, null_default};

/// Structured résumé record produced once per request by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub current_role: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub experience_years: u32,
    #[serde(deserialize_with = "null_default")]
    pub education: Education,
    #[serde(deserialize_with = "null_default")]
    pub technical_skills: TechnicalSkills,
    #[serde(deserialize_with = "null_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_default")]
    pub stats: ResumeStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient_string")]
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalSkills {
    #[serde(deserialize_with = "lenient_strings")]
    pub programming_languages: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub frameworks: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub databases: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeStats {
    #[serde(deserialize_with = "lenient_u32")]
    pub total_projects: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub total_technologies: u32,
}

impl TechnicalSkills {
    /// All skills in category order: languages, frameworks, databases, tools.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.programming_languages
            .iter()
            .chain(&self.frameworks)
            .chain(&self.databases)
            .chain(&self.tools)
    }

    pub fn count(&self) -> usize {
        self.all().count()
    }

    fn dedupe(&mut self) {
        for list in [
            &mut self.programming_languages,
            &mut self.frameworks,
            &mut self.databases,
            &mut self.tools,
        ] {
            *list = dedupe_case_insensitive(std::mem::take(list));
        }
    }
}

impl ResumeData {
    /// Dedupes skills, drops untitled projects and recomputes `stats`.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.current_role = self.current_role.trim().to_string();
        self.technical_skills.dedupe();
        self.projects.retain(|p| !p.title.trim().is_empty());

        let technologies = dedupe_case_insensitive(
            self.technical_skills
                .all()
                .chain(self.projects.iter().flat_map(|p| &p.technologies))
                .cloned(),
        );
        self.stats = ResumeStats {
            total_projects: self.projects.len() as u32,
            total_technologies: technologies.len() as u32,
        };
        self
    }

    pub fn seniority(&self) -> Seniority {
        Seniority::from_years(self.experience_years)
    }

    /// First language, else first framework.
    pub fn primary_tech(&self) -> Option<&str> {
        self.technical_skills
            .programming_languages
            .first()
            .or_else(|| self.technical_skills.frameworks.first())
            .map(String::as_str)
    }

    pub fn top_project(&self) -> Option<&Project> {
        self.projects.first()
    }

    pub fn has_education(&self) -> bool {
        !self.education.degree.is_empty()
    }
}

/// Experience bucket shared by every stage: ≤2 junior, ≤5 mid, otherwise senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
}

impl Seniority {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=2 => Seniority::Junior,
            3..=5 => Seniority::Mid,
            _ => Seniority::Senior,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid",
            Seniority::Senior => "senior",
        }
    }

    pub fn level_label(self) -> &'static str {
        match self {
            Seniority::Junior => "Entry Level",
            Seniority::Mid => "Mid Level",
            Seniority::Senior => "Senior Level",
        }
    }

    /// Attempts to read a seniority out of a free-form job level string.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if ["senior", "staff", "principal", "lead"]
            .iter()
            .any(|k| label.contains(k))
        {
            Some(Seniority::Senior)
        } else if ["junior", "entry", "graduate", "intern"]
            .iter()
            .any(|k| label.contains(k))
        {
            Some(Seniority::Junior)
        } else if ["mid", "intermediate"].iter().any(|k| label.contains(k)) {
            Some(Seniority::Mid)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
