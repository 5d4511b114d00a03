use crate::parser::{ParseError, parse_area_courses, parse_course_timetable, parse_subject_areas};
use crate::types::{AreaCatalogue, ClassSchedule, CourseListing, CourseRef};

use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

/// Builds the course search URL for a subject area. Spaces in area codes are sent as `+`.
pub fn subject_area_url(search_url: &str, area: &str, year: i32) -> String {
    let area = area.replace(' ', "+");
    format!("{search_url}?year={year}&m=r&subject={area}")
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::HOME_URL)
    }

    /// Points the scraper at another course catalogue host, e.g. a mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/{}", self.base_url, crate::SEARCH_PAGE)
    }

    pub fn course_url(&self, course: &CourseRef) -> String {
        match course {
            CourseRef::ByEntity(subject) => {
                format!("{}/{}", self.base_url, subject.url.trim_start_matches('/'))
            }
            CourseRef::ByUrl(url) => url.clone(),
        }
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Unexpected status {} for {}", status, url);
            return Err(ScraperError::Status {
                status,
                url: url.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;
        Ok(html)
    }

    pub async fn fetch_subject_areas(&self) -> Result<AreaCatalogue, ScraperError> {
        log::info!("Fetching subject areas...");
        let html = self.get_html(&self.search_url()).await?;
        Ok(parse_subject_areas(&html)?)
    }

    pub async fn fetch_area_courses(
        &self,
        area: &str,
        year: i32,
    ) -> Result<CourseListing, ScraperError> {
        let url = subject_area_url(&self.search_url(), area, year);
        log::info!("Fetching {} courses for {}: {}", area, year, url);
        let html = self.get_html(&url).await?;
        Ok(parse_area_courses(&html)?)
    }

    pub async fn fetch_course_timetable(
        &self,
        course: &CourseRef,
    ) -> Result<ClassSchedule, ScraperError> {
        let url = self.course_url(course);
        log::info!("Fetching course timetable: {}", url);
        let html = self.get_html(&url).await?;
        Ok(parse_course_timetable(&html)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Subject;

    #[test]
    fn test_subject_area_url_replaces_spaces() {
        let url = subject_area_url(
            "https://access.adelaide.edu.au/courses/search.asp",
            "COMP SCI",
            2023,
        );
        assert_eq!(
            url,
            "https://access.adelaide.edu.au/courses/search.asp?year=2023&m=r&subject=COMP+SCI"
        );
    }

    #[test]
    fn test_course_url_by_entity_and_by_url() {
        let scraper = WebScraper::with_base_url("https://example.edu/courses/").unwrap();
        assert_eq!(scraper.search_url(), "https://example.edu/courses/search.asp");

        let subject = Subject {
            term: "Semester 1".to_string(),
            catalogue: "MINING 3001".to_string(),
            title: "Mine Planning".to_string(),
            unit: 3,
            career: "Undergraduate".to_string(),
            campus: "North Terrace".to_string(),
            url: "details.asp?year=2023&course=108960+1+4310+1".to_string(),
        };
        assert_eq!(
            scraper.course_url(&CourseRef::ByEntity(subject)),
            "https://example.edu/courses/details.asp?year=2023&course=108960+1+4310+1"
        );

        let direct = "https://access.adelaide.edu.au/courses/details.asp?year=2023&course=1";
        assert_eq!(
            scraper.course_url(&CourseRef::ByUrl(direct.to_string())),
            direct
        );
    }

    #[test]
    fn test_default_scraper_targets_catalogue() {
        let scraper = WebScraper::new().unwrap();
        assert_eq!(
            scraper.search_url(),
            "https://access.adelaide.edu.au/courses/search.asp"
        );
    }
}
