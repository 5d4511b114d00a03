use std::process;

use adelaide_timetable::WebScraper;
use adelaide_timetable::types::CourseRef;
use adelaide_timetable::utils::{CourseFilter, ScheduleStats};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "adelaide-timetable")]
#[command(about = "A University of Adelaide course timetable scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        global = true,
        help = "Output format"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the subject areas that can be searched
    Areas,
    /// List the courses offered in a subject area
    Courses {
        #[arg(help = "Subject area code, e.g. MINING or \"COMP SCI\"")]
        area: String,

        #[arg(long, help = "Academic year (defaults to the current year)")]
        year: Option<i32>,

        #[arg(long, help = "Only show courses whose term contains this text")]
        term: Option<String>,

        #[arg(long, help = "Only show courses whose campus contains this text")]
        campus: Option<String>,

        #[arg(long, help = "Only show courses whose career contains this text")]
        career: Option<String>,

        #[arg(
            long,
            help = "Maximum number of results to return",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        limit: Option<u16>,

        #[arg(
            long,
            help = "Number of results to skip from the beginning",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        offset: Option<u16>,
    },
    /// Fetch the class timetable of a course
    Timetable {
        #[arg(
            help = "URL of the course detail page",
            required_unless_present_all = ["area", "course"],
            conflicts_with_all = ["area", "course"]
        )]
        url: Option<String>,

        #[arg(long, requires = "course", help = "Subject area to look the course up in")]
        area: Option<String>,

        #[arg(
            long,
            requires = "area",
            help = "Course key as listed by `courses`, e.g. \"Semester 1 MINING 3001 North Terrace\""
        )]
        course: Option<String>,

        #[arg(long, help = "Academic year (defaults to the current year)")]
        year: Option<i32>,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Areas => {
            let areas = scraper.fetch_subject_areas().await.unwrap_or_else(|e| {
                log::error!("Error fetching subject areas: {}", e);
                process::exit(1);
            });

            match cli.format {
                OutputFormat::Json => serialize_json(&areas),
                OutputFormat::Text => {
                    for (code, name) in &areas {
                        println!("{:<12} {}", code, name);
                    }
                    println!("\n{} subject area(s)", areas.len());
                }
            }
        }

        Commands::Courses {
            area,
            year,
            term,
            campus,
            career,
            limit,
            offset,
        } => {
            let filter = CourseFilter {
                term,
                campus,
                career,
                limit: limit.map(usize::from),
                offset: offset.map(usize::from),
            };

            let filter = filter.validate().unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let year = year.unwrap_or_else(current_year);
            let listing = scraper
                .fetch_area_courses(&area, year)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error fetching courses for {}: {}", area, e);
                    process::exit(1);
                });

            let subjects = filter.apply(listing);

            match cli.format {
                OutputFormat::Json => serialize_json(&subjects),
                OutputFormat::Text => {
                    if subjects.is_empty() {
                        println!("No courses to display.");
                    } else {
                        for (i, subject) in subjects.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, subject);
                        }
                    }
                }
            }
        }

        Commands::Timetable {
            url,
            area,
            course,
            year,
        } => {
            let course_ref = match (url, area, course) {
                (Some(url), _, _) => CourseRef::ByUrl(url),
                (None, Some(area), Some(key)) => {
                    let year = year.unwrap_or_else(current_year);
                    let mut listing = scraper
                        .fetch_area_courses(&area, year)
                        .await
                        .unwrap_or_else(|e| {
                            log::error!("Error fetching courses for {}: {}", area, e);
                            process::exit(1);
                        });

                    let subject = listing.remove(&key).unwrap_or_else(|| {
                        log::error!("Course '{}' is not offered in {} for {}", key, area, year);
                        process::exit(1);
                    });
                    CourseRef::from(subject)
                }
                _ => {
                    log::error!("Either a URL or both --area and --course are required");
                    process::exit(1);
                }
            };

            let schedule = scraper
                .fetch_course_timetable(&course_ref)
                .await
                .unwrap_or_else(|e| {
                    log::error!("Error fetching timetable: {}", e);
                    process::exit(1);
                });

            match cli.format {
                OutputFormat::Json => serialize_json(&schedule),
                OutputFormat::Text => {
                    if let CourseRef::ByEntity(subject) = &course_ref {
                        println!("{}", subject);
                    }
                    if schedule.is_empty() {
                        println!("No classes to display.");
                    } else {
                        print!("{}", schedule);
                        print!("{}", ScheduleStats::from_schedule(&schedule));
                    }
                }
            }
        }
    }
}
