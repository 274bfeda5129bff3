//! Day-by-day study plan builder

use serde::{Deserialize, Serialize};

use crate::models::SubjectColor;

const FOCUS_AREAS: [&str; 4] = [
    "Fundamentals",
    "Practice problems",
    "Review concepts",
    "Advanced topics",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSession {
    pub subject: String,
    /// Hours
    pub duration: u32,
    pub focus: String,
    pub color: SubjectColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: u32,
    pub sessions: Vec<PlanSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub days: Vec<PlanDay>,
    pub total_hours: u32,
    /// Narrative outline from the text generator, when it answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
}

/// Spread `hours_per_day` over the subjects for each day.
///
/// Each subject gets `hours / subjects` hours and the leftover hours go one
/// each to the first subjects of the day, so every day is fully planned. With
/// more subjects than hours each gets one hour and the tail subjects wait for
/// the next day's rotation.
pub fn build_study_plan(subjects: &[String], days_available: u32, hours_per_day: u32) -> StudyPlan {
    let subjects: Vec<&str> = subjects
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut days = Vec::with_capacity(days_available as usize);
    if subjects.is_empty() {
        return StudyPlan {
            days,
            total_hours: 0,
            outline: None,
        };
    }

    let share = (hours_per_day / subjects.len() as u32).max(1);
    let leftover = hours_per_day.saturating_sub(share * subjects.len() as u32);
    let mut total_hours = 0;

    for day in 1..=days_available {
        let offset = (day as usize - 1) % subjects.len();
        let mut remaining = hours_per_day;
        let mut sessions = Vec::new();

        for (slot, subject) in subjects.iter().cycle().skip(offset).take(subjects.len()).enumerate() {
            if remaining == 0 {
                break;
            }
            let bonus = u32::from((slot as u32) < leftover);
            let duration = (share + bonus).min(remaining);
            remaining -= duration;
            sessions.push(PlanSession {
                subject: subject.to_string(),
                duration,
                focus: FOCUS_AREAS[(day as usize - 1 + slot) % FOCUS_AREAS.len()].to_string(),
                color: SubjectColor::for_subject(subject),
            });
        }

        total_hours += hours_per_day - remaining;
        days.push(PlanDay { day, sessions });
    }

    StudyPlan {
        days,
        total_hours,
        outline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_hours_evenly() {
        let plan = build_study_plan(&subjects(&["Calculus", "Biology"]), 3, 4);
        assert_eq!(plan.days.len(), 3);
        assert_eq!(plan.total_hours, 12);
        for day in &plan.days {
            assert_eq!(day.sessions.len(), 2);
            assert!(day.sessions.iter().all(|s| s.duration == 2));
        }
        assert_eq!(plan.days[0].sessions[0].color, SubjectColor::Blue);
    }

    #[test]
    fn more_subjects_than_hours_rotates() {
        let plan = build_study_plan(&subjects(&["History", "Physics", "Chemistry"]), 3, 2);
        let firsts: Vec<&str> = plan.days.iter().map(|d| d.sessions[0].subject.as_str()).collect();
        assert_eq!(firsts, vec!["History", "Physics", "Chemistry"]);
        for day in &plan.days {
            assert_eq!(day.sessions.len(), 2);
            assert_eq!(day.sessions.iter().map(|s| s.duration).sum::<u32>(), 2);
        }
    }

    #[test]
    fn leftover_hours_go_to_first_subjects() {
        let plan = build_study_plan(&subjects(&["Art", "English"]), 1, 5);
        let hours: Vec<u32> = plan.days[0].sessions.iter().map(|s| s.duration).collect();
        assert_eq!(hours, vec![3, 2]);
        assert_eq!(plan.total_hours, 5);

        let plan = build_study_plan(&subjects(&["Art", "English", "Music"]), 2, 8);
        for day in &plan.days {
            let hours: Vec<u32> = day.sessions.iter().map(|s| s.duration).collect();
            assert_eq!(hours, vec![3, 3, 2]);
        }
        assert_eq!(plan.total_hours, 16);
    }

    #[test]
    fn focus_areas_rotate() {
        let plan = build_study_plan(&subjects(&["Calculus"]), 5, 1);
        let focus: Vec<&str> = plan.days.iter().map(|d| d.sessions[0].focus.as_str()).collect();
        assert_eq!(
            focus,
            vec!["Fundamentals", "Practice problems", "Review concepts", "Advanced topics", "Fundamentals"]
        );
    }

    #[test]
    fn blank_subjects_are_ignored() {
        let plan = build_study_plan(&subjects(&["  ", ""]), 2, 3);
        assert!(plan.days.is_empty());
        assert_eq!(plan.total_hours, 0);
    }
}
