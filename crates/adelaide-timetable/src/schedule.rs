//! Reassembles classes from the rows of a course timetable table.
//!
//! A class is printed as one primary row (`<tr class="data">`) holding the
//! class summary and its first meeting, followed by zero or more continuation
//! rows holding further meetings. There is no closing row, so the last class
//! is flushed when the rows run out.

use crate::parser::ParseError;
use crate::types::{Class, ClassSchedule, MeetingDate};

pub const PRIMARY_CELLS: usize = 8;
pub const CONTINUATION_CELLS: usize = 4;

/// Role of a single table row, decided from its markup alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Primary(Vec<String>),
    Continuation(Vec<String>),
    Skip,
}

impl RowKind {
    fn label(&self) -> &'static str {
        match self {
            RowKind::Header => "header",
            RowKind::Primary(_) => "primary",
            RowKind::Continuation(_) => "continuation",
            RowKind::Skip => "skip",
        }
    }
}

fn expect_cells(cells: &[String], expected: usize) -> Result<(), ParseError> {
    if cells.len() != expected {
        return Err(ParseError::UnexpectedCellCount {
            expected,
            found: cells.len(),
        });
    }
    Ok(())
}

fn parse_count(field: &'static str, text: &str) -> Result<u32, ParseError> {
    text.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

/// Builds a meeting from `date, day, time, location` cells, verbatim.
pub fn build_meeting_date(cells: &[String]) -> Result<MeetingDate, ParseError> {
    expect_cells(cells, CONTINUATION_CELLS)?;
    Ok(MeetingDate {
        date: cells[0].clone(),
        day: cells[1].clone(),
        time: cells[2].clone(),
        location: cells[3].clone(),
    })
}

/// Builds a class from a full primary row; the trailing four cells become its first meeting.
pub fn build_class(cells: &[String]) -> Result<Class, ParseError> {
    expect_cells(cells, PRIMARY_CELLS)?;
    let first_date = build_meeting_date(&cells[4..])?;

    Ok(Class {
        number: cells[0].clone(),
        section: cells[1].clone(),
        size: parse_count("size", &cells[2])?,
        available: parse_count("available", &cells[3])?,
        dates: vec![first_date],
    })
}

#[derive(Debug, Default)]
enum AssemblerState {
    #[default]
    NoOpenClass,
    ClassOpen(Class),
}

/// Single pass state machine folding classified rows into classes.
#[derive(Debug, Default)]
pub struct ScheduleAssembler {
    state: AssemblerState,
    classes: Vec<Class>,
}

impl ScheduleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: RowKind) -> Result<(), ParseError> {
        log::debug!("Timetable row: {}", row.label());

        match (std::mem::take(&mut self.state), row) {
            (state, RowKind::Header | RowKind::Skip) => {
                self.state = state;
            }
            (AssemblerState::NoOpenClass, RowKind::Primary(cells)) => {
                self.state = AssemblerState::ClassOpen(build_class(&cells)?);
            }
            (AssemblerState::ClassOpen(open), RowKind::Primary(cells)) => {
                let next = build_class(&cells)?;
                self.emit(open);
                self.state = AssemblerState::ClassOpen(next);
            }
            (AssemblerState::ClassOpen(mut open), RowKind::Continuation(cells)) => {
                open.dates.push(build_meeting_date(&cells)?);
                self.state = AssemblerState::ClassOpen(open);
            }
            (AssemblerState::NoOpenClass, RowKind::Continuation(cells)) => {
                return Err(ParseError::Structure(format!(
                    "continuation row {:?} appears before any class row",
                    cells
                )));
            }
        }

        Ok(())
    }

    fn emit(&mut self, class: Class) {
        log::debug!(
            "Class {} {} closed with {} meeting(s)",
            class.number,
            class.section,
            class.dates.len()
        );
        self.classes.push(class);
    }

    /// Flushes the open class and groups the result by class type.
    pub fn finish(mut self) -> Result<ClassSchedule, ParseError> {
        if let AssemblerState::ClassOpen(open) = std::mem::take(&mut self.state) {
            self.emit(open);
        }
        Ok(ClassSchedule::new(self.classes)?)
    }
}

pub fn assemble<I>(rows: I) -> Result<ClassSchedule, ParseError>
where
    I: IntoIterator<Item = RowKind>,
{
    let mut assembler = ScheduleAssembler::new();
    for row in rows {
        assembler.push(row)?;
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassType;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn primary(number: &str, section: &str, size: &str, available: &str) -> RowKind {
        RowKind::Primary(cells(&[
            number, section, size, available, "Mon 10/2", "Mon", "10-11", "Eng101",
        ]))
    }

    fn continuation(date: &str) -> RowKind {
        RowKind::Continuation(cells(&[date, "Mon", "10-11", "Eng101"]))
    }

    #[test]
    fn test_lecture_and_tutorial_scenario() {
        let rows = vec![
            RowKind::Header,
            primary("101", "LE01", "30", "5"),
            continuation("Mon 17/2"),
            RowKind::Primary(cells(&[
                "102", "TU01", "20", "0", "Tue 11/2", "Tue", "9-10", "Eng102",
            ])),
        ];

        let schedule = assemble(rows).expect("Failed to assemble");

        assert_eq!(schedule.classes().len(), 2);
        let lecture = &schedule.classes()[0];
        assert_eq!(lecture.number, "101");
        assert_eq!(lecture.size, 30);
        assert_eq!(lecture.available, 5);
        assert_eq!(lecture.dates.len(), 2);
        assert_eq!(lecture.dates[0].date, "Mon 10/2");
        assert_eq!(lecture.dates[1].date, "Mon 17/2");

        let tutorial = &schedule.classes()[1];
        assert_eq!(tutorial.dates.len(), 1);
        assert_eq!(tutorial.dates[0].location, "Eng102");

        assert_eq!(schedule.groups().len(), 2);
        assert_eq!(schedule.group(ClassType::Lecture)[0].number, "101");
        assert_eq!(schedule.group(ClassType::Tutorial)[0].number, "102");
    }

    #[test]
    fn test_one_class_per_primary_row() {
        let rows = vec![
            primary("1", "LE01", "100", "10"),
            continuation("a"),
            continuation("b"),
            continuation("c"),
            primary("2", "TU01", "20", "1"),
            RowKind::Skip,
            primary("3", "TU02", "20", "2"),
            continuation("d"),
        ];

        let schedule = assemble(rows).unwrap();
        let date_counts: Vec<usize> = schedule.classes().iter().map(|c| c.dates.len()).collect();
        assert_eq!(date_counts, vec![4, 1, 2]);
    }

    #[test]
    fn test_empty_rows() {
        let schedule = assemble(Vec::new()).unwrap();
        assert!(schedule.classes().is_empty());
        assert!(schedule.groups().is_empty());
    }

    #[test]
    fn test_only_headers_and_spacers() {
        let schedule = assemble(vec![RowKind::Header, RowKind::Skip, RowKind::Header]).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_unknown_class_type_fails_whole_schedule() {
        let rows = vec![primary("1", "LE01", "10", "1"), primary("2", "XX01", "10", "1")];
        let err = assemble(rows).unwrap_err();
        assert!(matches!(err, ParseError::UnknownClassType(_)));
    }

    #[test]
    fn test_continuation_without_open_class() {
        let rows = vec![RowKind::Header, continuation("Mon 17/2")];
        let err = assemble(rows).unwrap_err();
        assert!(matches!(err, ParseError::Structure(_)));
    }

    #[test]
    fn test_non_numeric_size() {
        let err = assemble(vec![primary("1", "LE01", "many", "1")]).unwrap_err();
        match err {
            ParseError::InvalidNumber { field, value } => {
                assert_eq!(field, "size");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_primary_row() {
        let err = assemble(vec![RowKind::Primary(cells(&["1", "LE01", "10"]))]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedCellCount {
                expected: PRIMARY_CELLS,
                found: 3
            }
        ));
    }

    #[test]
    fn test_meeting_fields_are_verbatim() {
        let date = build_meeting_date(&cells(&["", " Wed ", "TBA", "Online"])).unwrap();
        assert_eq!(date.date, "");
        assert_eq!(date.day, " Wed ");
        assert_eq!(date.time, "TBA");
    }

    #[test]
    fn test_class_number_is_opaque() {
        let class = build_class(&cells(&[
            "12A", "PR01", " 24 ", "0", "1 Mar", "Fri", "2pm", "Lab",
        ]))
        .unwrap();
        assert_eq!(class.number, "12A");
        assert_eq!(class.size, 24);
        assert_eq!(class.dates.len(), 1);
    }
}
