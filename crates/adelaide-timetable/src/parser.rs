use scraper::{ElementRef, Html, Selector};

use crate::schedule::{self, RowKind};
use crate::types::{AreaCatalogue, ClassSchedule, ClassTypeParseError, CourseListing, Subject};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Expected a number for {field}, found '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Expected {expected} cells in row, found {found}")]
    UnexpectedCellCount { expected: usize, found: usize },
    #[error(transparent)]
    UnknownClassType(#[from] ClassTypeParseError),
    #[error("Malformed timetable: {0}")]
    Structure(String),
}

pub const LISTING_CELLS: usize = 6;

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn row_cells(row: ElementRef) -> Vec<ElementRef> {
    let td_selector = Selector::parse("td").unwrap();
    row.select(&td_selector).collect()
}

/// Parses the subject area dropdown of the course search page.
pub fn parse_subject_areas(html: &str) -> Result<AreaCatalogue, ParseError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table#basic").unwrap();
    let option_selector = Selector::parse("option").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("subject area table".to_string()))?;

    let mut areas = AreaCatalogue::new();
    for option in table.select(&option_selector) {
        let code = option
            .value()
            .attr("value")
            .ok_or_else(|| ParseError::MissingField("option value".to_string()))?;

        if code.is_empty() {
            continue;
        }

        areas.insert(code.to_string(), elem_text(option).trim().to_string());
    }

    Ok(areas)
}

/// Parses the course search results table for one subject area.
///
/// The first row carries the column titles and is skipped by position. Later
/// rows sharing a term, catalogue number and campus replace earlier ones.
pub fn parse_area_courses(html: &str) -> Result<CourseListing, ParseError> {
    let document = Html::parse_document(html);
    let content_selector = Selector::parse("div.content").unwrap();
    let p_selector = Selector::parse("p").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();

    let results = document
        .select(&content_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("content section".to_string()))?
        .select(&p_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("results table".to_string()))?;

    let mut courses = CourseListing::new();
    for row in results.select(&tr_selector).skip(1) {
        let subject = build_subject(&row_cells(row))?;
        courses.insert(subject.key(), subject);
    }

    Ok(courses)
}

/// Builds a subject from the six cells of a search results row.
pub fn build_subject(cells: &[ElementRef]) -> Result<Subject, ParseError> {
    if cells.len() != LISTING_CELLS {
        return Err(ParseError::UnexpectedCellCount {
            expected: LISTING_CELLS,
            found: cells.len(),
        });
    }

    let a_selector = Selector::parse("a").unwrap();
    let url = cells[2]
        .select(&a_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ParseError::MissingField("course link".to_string()))?
        .to_string();

    let unit_text = elem_text(cells[3]);
    let unit = unit_text
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            field: "unit",
            value: unit_text.clone(),
        })?;

    Ok(Subject {
        term: elem_text(cells[0]).trim().to_string(),
        catalogue: elem_text(cells[1]),
        title: elem_text(cells[2]),
        unit,
        career: elem_text(cells[4]),
        campus: elem_text(cells[5]),
        url,
    })
}

/// Decides the role of a timetable row from its markup and cell count.
pub fn classify_row(row: ElementRef) -> RowKind {
    let th_selector = Selector::parse("th").unwrap();
    if row.select(&th_selector).next().is_some() {
        return RowKind::Header;
    }

    let cells: Vec<String> = row_cells(row).into_iter().map(elem_text).collect();

    // Only bare rows continue a class; any other class marks notes and group rows.
    match row.value().attr("class") {
        Some(class) if class.split_whitespace().eq(["data"]) => RowKind::Primary(cells),
        Some(_) => RowKind::Skip,
        None if cells.len() == 1 => RowKind::Skip,
        None => RowKind::Continuation(cells),
    }
}

/// Parses the class timetable of a course detail page.
pub fn parse_course_timetable(html: &str) -> Result<ClassSchedule, ParseError> {
    let document = Html::parse_document(html);
    let timetable_selector = Selector::parse("div#hidedata04_1").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();

    let timetable = document
        .select(&timetable_selector)
        .next()
        .ok_or_else(|| ParseError::MissingField("class timetable".to_string()))?;

    schedule::assemble(timetable.select(&tr_selector).map(classify_row))
}
