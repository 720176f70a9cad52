use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
    InterviewScheduled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub cover_letter: Option<String>,
    pub match_score: i32,
    pub status: String,
    pub recruiter_notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A candidate's own application with a summary of the job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary_range: Option<String>,
}

/// An application as a recruiter sees it: applicant identity plus CV highlights.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
}

/// An application across all of a recruiter's jobs, tagged with the job title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecruiterApplicationRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub title: String,
}
