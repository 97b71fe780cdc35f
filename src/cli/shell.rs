//! Interactive menu shell
//!
//! Generic over its input and output so any driver (terminal, script, test)
//! can run it. All catalog work goes through [`CatalogService`].

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::application::ApplicationError;
use crate::cli::output::{course_detail_text, failure_text, timing_text};
use crate::cli::{CliError, CliResult};
use crate::infrastructure::InfraError;

const MENU: &str = "
Menu:
    1. Load Data Structure
    2. Print Course List
    3. Print Course
    9. Exit
Enter choice: ";

const COURSE_PROMPT: &str = "What course do you want to know about? ";

/// One menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    PrintList,
    PrintCourse,
    Exit,
    Invalid(String),
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<u32>() {
            Ok(1) => MenuChoice::Load,
            Ok(2) => MenuChoice::PrintList,
            Ok(3) => MenuChoice::PrintCourse,
            Ok(9) => MenuChoice::Exit,
            _ => MenuChoice::Invalid(input.trim().to_string()),
        }
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    service: CatalogService,
    data_file: PathBuf,
    show_timing: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        input: R,
        output: W,
        service: CatalogService,
        data_file: PathBuf,
        show_timing: bool,
    ) -> Self {
        Self {
            input,
            output,
            service,
            data_file,
            show_timing,
        }
    }

    /// Loop over the menu until `9` or end of input.
    #[instrument(level = "debug", skip(self), fields(data_file = %self.data_file.display()))]
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            self.prompt(MENU)?;
            let Some(line) = self.read_line()? else {
                debug!("end of input");
                self.emit("")?;
                return self.emit("Goodbye.");
            };

            match MenuChoice::parse(&line) {
                MenuChoice::Load => self.load()?,
                MenuChoice::PrintList => self.print_list()?,
                MenuChoice::PrintCourse => self.print_course()?,
                MenuChoice::Exit => return self.emit("Goodbye."),
                MenuChoice::Invalid(choice) => {
                    debug!("invalid menu choice: {:?}", choice);
                    self.emit("Invalid option. Please try again.")?;
                }
            }
        }
    }

    /// Give the catalog back, e.g. to inspect it after a scripted session.
    pub fn into_service(self) -> CatalogService {
        self.service
    }

    fn load(&mut self) -> CliResult<()> {
        match self.service.load(&self.data_file) {
            Ok(report) => {
                for skipped in &report.skipped {
                    self.emit(failure_text(&format!("Error: Invalid format in {skipped}")))?;
                }
                let message = format!("Courses loaded successfully ({} courses)", report.loaded);
                self.emit("")?;
                if self.show_timing {
                    self.emit(timing_text(&message, report.elapsed))
                } else {
                    self.emit(format!("  {message}"))
                }
            }
            Err(ApplicationError::AlreadyLoaded(_)) => {
                self.emit(failure_text("Cannot load again, data was already loaded!"))
            }
            Err(ApplicationError::SourceUnreadable { path, source }) => {
                debug!("cannot open {}: {}", path.display(), source);
                self.emit(failure_text(&format!(
                    "Error: Could not open file: {}",
                    path.display()
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn print_list(&mut self) -> CliResult<()> {
        if !self.service.is_loaded() {
            return self.emit(failure_text("No data, Tree is empty!"));
        }

        let started = Instant::now();
        let lines: Vec<String> = self.service.courses()?.map(|c| c.to_string()).collect();

        self.emit("")?;
        self.emit("Course List:")?;
        for line in lines {
            self.emit(line)?;
        }
        self.emit_timing("Printed in", started)
    }

    fn print_course(&mut self) -> CliResult<()> {
        if !self.service.is_loaded() {
            return self.emit(failure_text("No data, Tree is empty!"));
        }

        self.prompt(COURSE_PROMPT)?;
        let wanted = self.read_line()?.unwrap_or_default();
        let wanted = wanted.trim();

        let started = Instant::now();
        let detail = self.service.find(wanted)?.map(course_detail_text);
        match detail {
            Some(detail) => self.emit(detail)?,
            None => self.emit(failure_text("Course not found."))?,
        }
        self.emit_timing("Printed in", started)
    }

    fn emit_timing(&mut self, label: &str, started: Instant) -> CliResult<()> {
        if self.show_timing {
            self.emit(timing_text(label, started.elapsed()))?;
        }
        Ok(())
    }

    fn emit(&mut self, line: impl Display) -> CliResult<()> {
        writeln!(self.output, "{line}").map_err(|e| io_err("write menu output", e))
    }

    fn prompt(&mut self, text: &str) -> CliResult<()> {
        write!(self.output, "{text}")
            .and_then(|_| self.output.flush())
            .map_err(|e| io_err("write prompt", e))
    }

    /// Next input line without its line ending; `None` at end of input.
    fn read_line(&mut self) -> CliResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| io_err("read menu input", e))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn io_err(context: &str, source: std::io::Error) -> CliError {
    InfraError::io(context, source).into()
}
