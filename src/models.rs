//! Entity shapes shared with the persistence layer and the web client
//!
//! Every status-like field is a closed enum; the wire spelling matches what
//! the client already sends (`"in-progress"`, `"like-new"`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub display_name: Option<String>,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Role,
    /// Identity-provider user id
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub content: String,
    pub subject: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: u64,
    pub user_id: u64,
    pub note_id: Option<u64>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: u64,
    pub user_id: u64,
    pub subject: Option<String>,
    /// Minutes
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Percentage of the session spent focused
    pub focus_score: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookCondition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Available,
    Sold,
    Reserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    /// Seller
    pub user_id: u64,
    pub title: String,
    pub author: String,
    pub edition: Option<String>,
    pub condition: BookCondition,
    /// Cents
    pub original_price: Option<u64>,
    /// Cents
    pub price: u64,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Whole-percent saving against the original price, if one is known
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price.filter(|p| *p > 0)?;
        if self.price >= original {
            return Some(0);
        }
        let saved = (original - self.price) * 100 / original;
        u8::try_from(saved).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: u64,
    pub teacher_id: u64,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub points: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Draft,
    #[default]
    Submitted,
    Graded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    pub assignment_id: u64,
    pub student_id: u64,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub grade: Option<u32>,
    pub feedback: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

/// Palette used to tag subjects in plans and dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectColor {
    Blue,
    Green,
    Purple,
    Amber,
    Red,
    Teal,
    Pink,
    Slate,
}

impl SubjectColor {
    /// Unknown subjects fall back to `Slate`.
    pub fn for_subject(subject: &str) -> Self {
        match subject.trim().to_ascii_lowercase().as_str() {
            "math" | "mathematics" | "calculus" | "algebra" | "statistics" => Self::Blue,
            "biology" | "environmental science" => Self::Green,
            "physics" | "astronomy" => Self::Purple,
            "history" | "geography" => Self::Amber,
            "chemistry" => Self::Red,
            "computer science" | "programming" => Self::Teal,
            "english" | "literature" | "art" => Self::Pink,
            _ => Self::Slate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_enums_use_client_spelling() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "in-progress");
        assert_eq!(serde_json::to_value(BookCondition::LikeNew).unwrap(), "like-new");
        assert_eq!(serde_json::to_value(TaskPriority::Urgent).unwrap(), "urgent");
        assert_eq!(serde_json::to_value(Role::Teacher).unwrap(), "teacher");
    }

    #[test]
    fn user_uses_photo_url_casing() {
        let user = User {
            id: 1,
            display_name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            photo_url: None,
            role: Role::Student,
            uid: "abc".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["displayName"], "Ada");
        assert!(value.get("photoURL").is_some());
        assert_eq!(value["role"], "student");
    }

    #[test]
    fn task_defaults_when_fields_absent() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "userId": 1,
            "title": "Read chapter 4",
            "description": null,
            "dueDate": null,
            "subject": "History",
            "createdAt": "2024-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_overdue(Utc::now()));
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let err = serde_json::from_value::<BookCondition>(json!("mint"));
        assert!(err.is_err());
    }

    #[test]
    fn book_discount() {
        let mut book: Book = serde_json::from_value(json!({
            "id": 1,
            "userId": 2,
            "title": "Calculus: Early Transcendentals",
            "author": "James Stewart",
            "edition": "8th",
            "condition": "good",
            "originalPrice": 12000,
            "price": 4500,
            "description": null,
            "subject": "Mathematics",
            "imageUrl": null,
            "createdAt": "2024-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.discount_percent(), Some(62));

        book.original_price = None;
        assert_eq!(book.discount_percent(), None);
    }

    #[test]
    fn subject_color_defaults_on_miss() {
        assert_eq!(SubjectColor::for_subject("  Calculus "), SubjectColor::Blue);
        assert_eq!(SubjectColor::for_subject("Chemistry"), SubjectColor::Red);
        assert_eq!(SubjectColor::for_subject("Underwater basket weaving"), SubjectColor::Slate);
    }
}
