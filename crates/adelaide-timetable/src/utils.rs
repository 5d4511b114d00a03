use std::collections::BTreeMap;

use crate::types::{ClassSchedule, ClassType, CourseListing, Subject};

#[derive(Debug, Default)]
pub struct CourseFilter {
    pub term: Option<String>,
    pub campus: Option<String>,
    pub career: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl CourseFilter {
    /// Returns the matching subjects in course key order.
    pub fn apply(self, listing: CourseListing) -> Vec<Subject> {
        let mut subjects: Vec<Subject> = listing.into_values().collect();

        if let Some(term) = &self.term {
            subjects.retain(|s| contains_ci(&s.term, term));
        }
        if let Some(campus) = &self.campus {
            subjects.retain(|s| contains_ci(&s.campus, campus));
        }
        if let Some(career) = &self.career {
            subjects.retain(|s| contains_ci(&s.career, career));
        }
        if let Some(off) = self.offset {
            subjects = subjects.into_iter().skip(off).collect();
        }
        if let Some(lim) = self.limit {
            subjects.truncate(lim);
        }
        subjects
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.offset.is_some_and(|o| o == 0) {
            return Err("Offset must be greater than 0".to_string());
        }
        if self.limit.is_some_and(|l| l == 0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub struct ScheduleStats {
    pub per_type: BTreeMap<ClassType, usize>,
    pub enrolled: u64,
    pub available: u64,
    pub full: usize,
    pub total: usize,
}

impl ScheduleStats {
    pub fn from_schedule(schedule: &ClassSchedule) -> ScheduleStats {
        let classes = schedule.classes();
        ScheduleStats {
            per_type: schedule
                .groups()
                .iter()
                .map(|(class_type, group)| (*class_type, group.len()))
                .collect(),
            enrolled: classes.iter().map(|c| u64::from(c.size)).sum(),
            available: classes.iter().map(|c| u64::from(c.available)).sum(),
            full: classes.iter().filter(|c| c.available == 0).count(),
            total: classes.len(),
        }
    }
}

impl std::fmt::Display for ScheduleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        for (class_type, count) in &self.per_type {
            writeln!(f, "  {:<16}{}", format!("{}s:", class_type), count)?;
        }
        writeln!(f, "  Class size:     {}", self.enrolled)?;
        writeln!(f, "  Seats left:     {}", self.available)?;
        writeln!(f, "  Full classes:   {}", self.full)?;
        writeln!(f, "  Total:          {}", self.total)
    }
}
