use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Seniority a posting asks for. Selects the experience-to-points curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            other => Err(format!("unknown experience level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Inactive,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
        }
    }
}

/// A job posting as the matcher sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub id: Uuid,
    pub required_skills: Vec<String>,
    /// `None` when the stored level is not one the matcher knows; such jobs earn no
    /// experience credit.
    pub experience_level: Option<ExperienceLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub employment_type: String,
    pub required_skills: Vec<String>,
    pub experience_level: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Narrow projection used by the matcher; avoids pulling descriptions for every job.
#[derive(Debug, Clone, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub required_skills: Vec<String>,
    pub experience_level: String,
}

impl From<JobMatchRow> for JobPosting {
    fn from(row: JobMatchRow) -> Self {
        JobPosting {
            id: row.id,
            required_skills: row.required_skills,
            experience_level: row.experience_level.parse().ok(),
        }
    }
}

/// Job listing row with its application count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobListingRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub applications_count: i64,
}

/// Job detail row with the posting recruiter's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDetailRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub recruiter_first_name: String,
    pub recruiter_last_name: String,
}
