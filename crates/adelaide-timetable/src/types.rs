use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subject area code (e.g. `MINING`) mapped to its human readable name.
pub type AreaCatalogue = BTreeMap<String, String>;

/// Course key (`"{term} {catalogue} {campus}"`) mapped to the offering.
pub type CourseListing = BTreeMap<String, Subject>;

#[derive(Debug, thiserror::Error)]
#[error("Unknown class type '{0}'. Accepted prefixes: 'LE', 'WR', 'PR', 'PJ', 'TU'")]
pub struct ClassTypeParseError(String);

impl ClassTypeParseError {
    pub fn code(&self) -> &str {
        &self.0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ClassType {
    Lecture,
    Workshop,
    Practical,
    Project,
    Tutorial,
}

impl ClassType {
    /// Classifies a section code such as `LE01` by its two-letter prefix.
    pub fn from_section(section: &str) -> Result<Self, ClassTypeParseError> {
        let prefix = section
            .get(..2)
            .ok_or_else(|| ClassTypeParseError(section.to_string()))?;
        prefix
            .parse()
            .map_err(|_| ClassTypeParseError(section.to_string()))
    }
}

impl FromStr for ClassType {
    type Err = ClassTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LE" => Ok(ClassType::Lecture),
            "WR" => Ok(ClassType::Workshop),
            "PR" => Ok(ClassType::Practical),
            "PJ" => Ok(ClassType::Project),
            "TU" => Ok(ClassType::Tutorial),
            _ => Err(ClassTypeParseError(s.to_string())),
        }
    }
}

impl Display for ClassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassType::Lecture => write!(f, "Lecture"),
            ClassType::Workshop => write!(f, "Workshop"),
            ClassType::Practical => write!(f, "Practical"),
            ClassType::Project => write!(f, "Project"),
            ClassType::Tutorial => write!(f, "Tutorial"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub term: String,
    pub catalogue: String,
    pub title: String,
    pub unit: u32,
    pub career: String,
    pub campus: String,
    /// Detail page link, relative to the course catalogue home.
    pub url: String,
}

impl Subject {
    pub fn key(&self) -> String {
        format!("{} {} {}", self.term, self.catalogue, self.campus)
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} ({} units) · {} · {}",
            self.term, self.catalogue, self.title, self.unit, self.career, self.campus
        )
    }
}

/// A single meeting occurrence. Fields are kept exactly as the page shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDate {
    pub date: String,
    pub day: String,
    pub time: String,
    pub location: String,
}

impl Display for MeetingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} · {} · {} · {}",
            self.date, self.day, self.time, self.location
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Class number as printed; not guaranteed to be numeric.
    pub number: String,
    pub section: String,
    pub size: u32,
    pub available: u32,
    pub dates: Vec<MeetingDate>,
}

impl Class {
    pub fn class_type(&self) -> Result<ClassType, ClassTypeParseError> {
        ClassType::from_section(&self.section)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "  ▸ {} {} · size {} · {} available",
            self.number, self.section, self.size, self.available
        )?;
        for date in &self.dates {
            writeln!(f, "    {}", date)?;
        }
        Ok(())
    }
}

/// Classes of one course, with a grouping by class type derived on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSchedule {
    classes: Vec<Class>,
    groups: BTreeMap<ClassType, Vec<Class>>,
}

impl ClassSchedule {
    pub fn new(classes: Vec<Class>) -> Result<Self, ClassTypeParseError> {
        let groups = group_by_class_type(&classes)?;
        Ok(Self { classes, groups })
    }

    /// Replaces the class list and regroups. On error the schedule is left untouched.
    pub fn set_classes(&mut self, classes: Vec<Class>) -> Result<(), ClassTypeParseError> {
        self.groups = group_by_class_type(&classes)?;
        self.classes = classes;
        Ok(())
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn groups(&self) -> &BTreeMap<ClassType, Vec<Class>> {
        &self.groups
    }

    pub fn group(&self, class_type: ClassType) -> &[Class] {
        self.groups
            .get(&class_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn group_by_class_type(
    classes: &[Class],
) -> Result<BTreeMap<ClassType, Vec<Class>>, ClassTypeParseError> {
    let mut groups: BTreeMap<ClassType, Vec<Class>> = BTreeMap::new();
    for class in classes {
        groups
            .entry(class.class_type()?)
            .or_default()
            .push(class.clone());
    }
    Ok(groups)
}

impl Display for ClassSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} class(es)", self.classes.len())?;
        for (class_type, classes) in &self.groups {
            writeln!(f, "── {} ({})", class_type, classes.len())?;
            for class in classes {
                write!(f, "{}", class)?;
            }
        }
        Ok(())
    }
}

/// What to fetch a timetable for: a listed subject, or a detail page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRef {
    ByEntity(Subject),
    ByUrl(String),
}

impl From<Subject> for CourseRef {
    fn from(subject: Subject) -> Self {
        CourseRef::ByEntity(subject)
    }
}
