//! Interactive menu loop.
//!
//! # Responsibility
//! - Read one command per line and prompt for its arguments.
//! - Parse dates and hours at the boundary before calling the tracker.
//!
//! # Invariants
//! - Every failure is reported and the loop continues; only quit or end of
//!   input ends the session.

use chrono::NaiveDate;
use logshift_core::{
    parse_date, parse_hours, week_bounds, CsvExporter, Project, Tracker, TrackerError,
    TrackerRepository, User, WorkEntry,
};
use std::io::{self, BufRead, Write};

const BANNER: &str = r"
 _                ____  _     _  __ _
| |    ___   __ _/ ___|| |__ (_)/ _| |_
| |   / _ \ / _` \___ \| '_ \| | |_| __|
| |__| (_) | (_| |___) | | | | |  _| |_
|_____\___/ \__, |____/|_| |_|_|_|  \__|
            |___/
";

const OPTIONS: &str = "
----------------------------------------
[1]  Add new work entry
[2]  Create new project
[3]  Create new user
[4]  Show working hours by user
[5]  Show working hours by project
[6]  Show working hours this calendar week
[7]  Help
[8]  List users
[9]  List projects
[10] Show work entries by user
[11] Show work entries by project
[12] Export user's work entries to CSV
[0]  Quit
----------------------------------------
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddWorkEntry,
    CreateProject,
    CreateUser,
    HoursByUser,
    HoursByProject,
    HoursThisWeek,
    Help,
    ListUsers,
    ListProjects,
    EntriesByUser,
    EntriesByProject,
    ExportCsv,
    Quit,
}

impl MenuChoice {
    fn parse(raw: &str) -> Option<Self> {
        let choice = match raw.trim() {
            "1" => Self::AddWorkEntry,
            "2" => Self::CreateProject,
            "3" => Self::CreateUser,
            "4" => Self::HoursByUser,
            "5" => Self::HoursByProject,
            "6" => Self::HoursThisWeek,
            "7" => Self::Help,
            "8" => Self::ListUsers,
            "9" => Self::ListProjects,
            "10" => Self::EntriesByUser,
            "11" => Self::EntriesByProject,
            "12" => Self::ExportCsv,
            "0" => Self::Quit,
            _ => return None,
        };
        Some(choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One interactive session over arbitrary line input and text output.
pub struct Session<'t, R: TrackerRepository, I: BufRead, O: Write> {
    tracker: &'t Tracker<R>,
    exporter: &'t CsvExporter,
    input: I,
    output: O,
    today: NaiveDate,
}

impl<'t, R: TrackerRepository, I: BufRead, O: Write> Session<'t, R, I, O> {
    pub fn new(
        tracker: &'t Tracker<R>,
        exporter: &'t CsvExporter,
        input: I,
        output: O,
        today: NaiveDate,
    ) -> Self {
        Self {
            tracker,
            exporter,
            input,
            output,
            today,
        }
    }

    /// Runs until quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{BANNER}")?;
        writeln!(self.output, "{OPTIONS}")?;

        loop {
            let Some(line) = self.ask("Input options ([7] help): ")? else {
                break;
            };
            let flow = match MenuChoice::parse(&line) {
                Some(choice) => self.dispatch(choice)?,
                None => {
                    writeln!(self.output, "Invalid input")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<Flow> {
        match choice {
            MenuChoice::AddWorkEntry => self.add_work_entry(),
            MenuChoice::CreateProject => self.create_project(),
            MenuChoice::CreateUser => self.create_user(),
            MenuChoice::HoursByUser => self.hours_by_user(),
            MenuChoice::HoursByProject => self.hours_by_project(),
            MenuChoice::HoursThisWeek => self.hours_this_week(),
            MenuChoice::Help => {
                writeln!(self.output, "{OPTIONS}")?;
                Ok(Flow::Continue)
            }
            MenuChoice::ListUsers => self.list_users(),
            MenuChoice::ListProjects => self.list_projects(),
            MenuChoice::EntriesByUser => self.entries_by_user(),
            MenuChoice::EntriesByProject => self.entries_by_project(),
            MenuChoice::ExportCsv => self.export_csv(),
            MenuChoice::Quit => Ok(Flow::Quit),
        }
    }

    fn add_work_entry(&mut self) -> io::Result<Flow> {
        let Some(users) = self.report(self.tracker.get_users())? else {
            return Ok(Flow::Continue);
        };
        let Some(projects) = self.report(self.tracker.get_projects())? else {
            return Ok(Flow::Continue);
        };
        if users.is_empty() || projects.is_empty() {
            writeln!(self.output, "Users or projects not found")?;
            return Ok(Flow::Continue);
        }

        let Some(username) = self.ask("Enter username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(user) = self.find_user(&username)? else {
            return Ok(Flow::Continue);
        };

        let Some(project_id) = self.ask("Enter project id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(project) = self.find_project(&project_id)? else {
            return Ok(Flow::Continue);
        };

        let Some(raw_date) = self.ask("Enter date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Quit);
        };
        let date = match parse_date(&raw_date) {
            Ok(date) => date,
            Err(err) => {
                writeln!(self.output, "Invalid date format: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        let Some(raw_hours) = self.ask("Enter hours worked: ")? else {
            return Ok(Flow::Quit);
        };
        let hours = match parse_hours(&raw_hours) {
            Ok(hours) => hours,
            Err(err) => {
                writeln!(self.output, "Invalid hours worked: {err}")?;
                return Ok(Flow::Continue);
            }
        };

        let Some(description) = self.ask("Enter description of the work done: ")? else {
            return Ok(Flow::Quit);
        };

        match self
            .tracker
            .add_work_entry(&user, date, &project, hours, &description)
        {
            Ok(_) => writeln!(self.output, "New entry successfully added")?,
            Err(err) => writeln!(self.output, "Failed to add new entry: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn create_project(&mut self) -> io::Result<Flow> {
        let Some(id) = self.ask("Give project id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(name) = self.ask("Give project name: ")? else {
            return Ok(Flow::Quit);
        };

        match self.tracker.add_project(&id, &name) {
            Ok(project) => writeln!(self.output, "Project {} created", project.name)?,
            Err(TrackerError::Duplicate(key)) => {
                writeln!(self.output, "Project not created: {key}")?
            }
            Err(err) => writeln!(
                self.output,
                "Failed to create project {name} with id {id}: {err}"
            )?,
        }
        Ok(Flow::Continue)
    }

    fn create_user(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Give username: ")? else {
            return Ok(Flow::Quit);
        };

        match self.tracker.add_user(&username) {
            Ok(user) => writeln!(self.output, "User {} created", user.username)?,
            Err(TrackerError::Duplicate(key)) => writeln!(self.output, "User not created: {key}")?,
            Err(err) => writeln!(self.output, "Failed to create user {username}: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn hours_by_user(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Enter username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(user) = self.find_user(&username)? else {
            return Ok(Flow::Continue);
        };

        if let Some(total) = self.report(self.tracker.total_hours_by_user(&user))? {
            writeln!(
                self.output,
                "Total hours worked by {}: {total}",
                user.username
            )?;
        }
        Ok(Flow::Continue)
    }

    fn hours_by_project(&mut self) -> io::Result<Flow> {
        let Some(id) = self.ask("Enter project id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(project) = self.find_project(&id)? else {
            return Ok(Flow::Continue);
        };

        if let Some(total) = self.report(self.tracker.total_hours_by_project(&project))? {
            writeln!(
                self.output,
                "Total hours worked on {}: {total}",
                project.name
            )?;
        }
        Ok(Flow::Continue)
    }

    fn hours_this_week(&mut self) -> io::Result<Flow> {
        let (start, end) = week_bounds(self.today);
        if let Some(total) = self.report(self.tracker.total_hours_by_week(start, end))? {
            writeln!(
                self.output,
                "Total hours worked this calendar week ({start} to {end}): {total}"
            )?;
        }
        Ok(Flow::Continue)
    }

    fn list_users(&mut self) -> io::Result<Flow> {
        let Some(users) = self.report(self.tracker.get_users())? else {
            return Ok(Flow::Continue);
        };
        if users.is_empty() {
            writeln!(self.output, "No users yet")?;
        }
        for user in users {
            writeln!(self.output, "{}", user.username)?;
        }
        Ok(Flow::Continue)
    }

    fn list_projects(&mut self) -> io::Result<Flow> {
        let Some(projects) = self.report(self.tracker.get_projects())? else {
            return Ok(Flow::Continue);
        };
        if projects.is_empty() {
            writeln!(self.output, "No projects yet")?;
        }
        for project in projects {
            writeln!(self.output, "{}  {}", project.id, project.name)?;
        }
        Ok(Flow::Continue)
    }

    fn entries_by_user(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Enter username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(user) = self.find_user(&username)? else {
            return Ok(Flow::Continue);
        };

        let Some(entries) = self.report(self.tracker.work_entries_by_user(&user))? else {
            return Ok(Flow::Continue);
        };
        self.print_entries(&entries, |entry| entry.project.name.as_str())?;
        Ok(Flow::Continue)
    }

    fn entries_by_project(&mut self) -> io::Result<Flow> {
        let Some(id) = self.ask("Enter project id: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(project) = self.find_project(&id)? else {
            return Ok(Flow::Continue);
        };

        let Some(entries) = self.report(self.tracker.work_entries_by_project(&project))? else {
            return Ok(Flow::Continue);
        };
        self.print_entries(&entries, |entry| entry.user.username.as_str())?;
        Ok(Flow::Continue)
    }

    fn export_csv(&mut self) -> io::Result<Flow> {
        let Some(username) = self.ask("Enter username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(user) = self.find_user(&username)? else {
            return Ok(Flow::Continue);
        };

        match self.tracker.save_work_entries_to_csv(&user, self.exporter) {
            Ok(summary) => writeln!(
                self.output,
                "Exported {} entries to {}",
                summary.rows,
                summary.path.display()
            )?,
            Err(err) => writeln!(self.output, "Export failed: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn print_entries(
        &mut self,
        entries: &[WorkEntry],
        counterpart: impl Fn(&WorkEntry) -> &str,
    ) -> io::Result<()> {
        if entries.is_empty() {
            return writeln!(self.output, "No work entries");
        }
        for entry in entries {
            writeln!(
                self.output,
                "{}  {}  {}h  {}",
                entry.date,
                counterpart(entry),
                entry.hours_worked,
                entry.description
            )?;
        }
        Ok(())
    }

    /// Resolves a username, reporting a miss or a storage failure.
    fn find_user(&mut self, username: &str) -> io::Result<Option<User>> {
        match self.report(self.tracker.get_user(username))? {
            Some(Some(user)) => Ok(Some(user)),
            Some(None) => {
                writeln!(self.output, "User not found")?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Resolves a project id, reporting a miss or a storage failure.
    fn find_project(&mut self, id: &str) -> io::Result<Option<Project>> {
        match self.report(self.tracker.get_project(id))? {
            Some(Some(project)) => Ok(Some(project)),
            Some(None) => {
                writeln!(self.output, "Project not found")?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Prints the error and yields `None` on failure.
    fn report<T>(&mut self, result: Result<T, TrackerError>) -> io::Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                writeln!(self.output, "Storage error: {err}")?;
                Ok(None)
            }
        }
    }

    /// Prompts and reads one line; `None` on end of input.
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
