pub mod parser;
pub mod schedule;
pub mod scraper;
pub mod types;
pub mod utils;

pub use parser::{ParseError, parse_area_courses, parse_course_timetable, parse_subject_areas};
pub use scraper::{ScraperError, WebScraper};

pub const HOME_URL: &str = "https://access.adelaide.edu.au/courses";
pub(crate) const SEARCH_PAGE: &str = "search.asp";
