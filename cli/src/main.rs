//! Command-line shell over the student records API.
//!
//! Each subcommand drives one of the core's page state machines and prints
//! what a UI would render: rows, a record, a notification, or an error panel.
//! Failures exit non-zero.

mod transport;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use student_core::{
    Config, CreatePage, DetailPage, EditPage, ListPage, ListView, Load, NotificationKind, Route,
    Sort, SortDirection, Student, StudentApi, StudentClient, StudentFormData, StudentQueries,
    SubmitOutcome,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::transport::UreqTransport;

type Queries = StudentQueries<UreqTransport>;

#[derive(Parser)]
#[command(
    name = "students",
    version,
    about = "Manage student records",
    long_about = None,
    arg_required_else_help = true,
    after_help = r#"EXAMPLES
  $ students list --sort namaLengkap,asc
  $ students list --search budi
  $ students create --first-name Budi --last-name Santoso --dob 2000-05-17
  $ students edit 2026001 --clear-last-name
  $ students delete 2026001 --yes

The API base URL defaults to $STUDENT_API_BASE_URL, then http://localhost:8712/api."#
)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List students, or search them by name
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Rows per page
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        size: Option<u32>,
        /// Sort as `field,direction`, e.g. `usia,desc`
        #[arg(long, value_name = "FIELD,DIR")]
        sort: Option<Sort>,
        /// Case-insensitive match on first or last name
        #[arg(long, value_name = "KEYWORD")]
        search: Option<String>,
    },
    /// Show one student
    Show {
        #[arg(value_name = "STUDENT_NO")]
        nomor_induk: String,
    },
    /// Register a new student
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        /// Date of birth
        #[arg(long, value_name = "YYYY-MM-DD")]
        dob: String,
    },
    /// Change an existing student
    Edit {
        #[arg(value_name = "STUDENT_NO")]
        nomor_induk: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete a student
    Delete {
        #[arg(value_name = "STUDENT_NO")]
        nomor_induk: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Open a UI route such as `/students/2026001`
    Open {
        #[arg(value_name = "PATH")]
        route: Route,
    },
}

/// Fields not given keep their current value.
#[derive(Args, Debug, Default)]
struct EditArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long, conflicts_with = "clear_last_name")]
    last_name: Option<String>,
    /// Remove the last name
    #[arg(long)]
    clear_last_name: bool,
    /// Date of birth
    #[arg(long, value_name = "YYYY-MM-DD")]
    dob: Option<String>,
}

impl EditArgs {
    fn apply(&self, form: &mut StudentFormData) {
        if let Some(first) = &self.first_name {
            form.nama_depan = first.clone();
        }
        if self.clear_last_name {
            form.nama_belakang = None;
        } else if let Some(last) = &self.last_name {
            form.nama_belakang = Some(last.clone());
        }
        if let Some(dob) = &self.dob {
            form.tanggal_lahir = dob.clone();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let config = match cli.base_url.as_deref() {
        Some(url) => config.with_base_url(url)?,
        None => config,
    };
    debug!(base_url = %config.api_base_url, "using API");

    let api = StudentApi::new(StudentClient::new(&config.api_base_url), UreqTransport::new());
    let mut queries = StudentQueries::new(api, config.stale_time);
    let page_size = config.page_size;

    match cli.command {
        Command::List {
            page,
            size,
            sort,
            search,
        } => {
            let mut list = ListPage::new(size.unwrap_or(page_size));
            if let Some(sort) = sort {
                list.set_sort(sort);
            }
            if let Some(keyword) = search.as_deref() {
                list.set_keyword(keyword.trim());
            }
            list.go_to(page - 1);
            show_list(&mut queries, &list)
        }
        Command::Show { nomor_induk } => show_student(&mut queries, &nomor_induk),
        Command::Create {
            first_name,
            last_name,
            dob,
        } => {
            let form = StudentFormData::new(&first_name, last_name.as_deref(), &dob);
            let outcome = CreatePage::new().submit(&mut queries, &form, today());
            report(outcome)
        }
        Command::Edit {
            nomor_induk,
            changes,
        } => {
            let mut edit = EditPage::new(&nomor_induk);
            let mut form = settle(edit.load(&mut queries))?;
            changes.apply(&mut form);
            let outcome = edit.submit(&mut queries, &form, today());
            report(outcome)
        }
        Command::Delete { nomor_induk, yes } => delete_student(&mut queries, &nomor_induk, yes),
        Command::Open { route } => match &route {
            Route::StudentList => show_list(&mut queries, &ListPage::new(page_size)),
            Route::StudentDetail(id) => show_student(&mut queries, id),
            Route::CreateStudent | Route::EditStudent(_) => {
                bail!("`{route}` takes form input; use `students create` or `students edit`")
            }
        },
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A blocking transport always resolves, so `Loading` means an identical
/// request was already in flight.
fn settle<T>(load: Load<T>) -> Result<T> {
    match load {
        Load::Ready(value) => Ok(value),
        Load::Failed(panel) => Err(anyhow!("{panel}")),
        Load::Loading => bail!("request did not complete"),
    }
}

fn show_list(queries: &mut Queries, list: &ListPage) -> Result<()> {
    let view = settle(list.load(queries))?;
    print!("{}", render_list(&view, list.sort()));
    Ok(())
}

fn show_student(queries: &mut Queries, nomor_induk: &str) -> Result<()> {
    let student = settle(DetailPage::new(nomor_induk).load(queries))?;
    print!("{}", render_student(&student));
    Ok(())
}

fn report(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Invalid(errors) => bail!("Please fix the following:\n{errors}"),
        SubmitOutcome::Rejected(panel) => bail!("{panel}"),
        SubmitOutcome::Saved {
            student,
            redirect,
            notification,
        } => {
            println!("{}", notification.message);
            print!("{}", render_student(&student));
            println!("-> {redirect}");
            Ok(())
        }
    }
}

fn delete_student(queries: &mut Queries, nomor_induk: &str, yes: bool) -> Result<()> {
    let mut page = DetailPage::new(nomor_induk);
    let student = settle(page.load(queries))?;
    page.open_delete(&student);

    let prompt = format!(
        "Delete {} ({})? This cannot be undone.",
        student.nama_lengkap, student.nomor_induk
    );
    if !yes && !confirm(&prompt)? {
        page.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }

    let Some(outcome) = page.confirm_delete(queries) else {
        bail!("no student selected for deletion");
    };
    match outcome.notification.kind {
        NotificationKind::Success => {
            println!("{}", outcome.notification.message);
            if let Some(route) = outcome.redirect {
                debug!(%route, "redirect");
            }
            Ok(())
        }
        NotificationKind::Error => bail!("{}", outcome.notification.message),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

const COLUMNS: [(&str, &str); 3] = [
    ("nomorInduk", "Student No."),
    ("namaLengkap", "Full Name"),
    ("usia", "Age"),
];

fn header(field: &str, label: &str, sort: &Sort) -> String {
    if sort.field != field {
        return label.to_string();
    }
    match sort.direction {
        SortDirection::Asc => format!("{label} ^"),
        SortDirection::Desc => format!("{label} v"),
    }
}

fn render_list(view: &ListView, sort: &Sort) -> String {
    if let Some(message) = &view.empty_message {
        return format!("{message}\n");
    }
    let headers: Vec<String> = COLUMNS
        .iter()
        .map(|(field, label)| header(field, label, sort))
        .collect();
    let mut out = format!("{:<14}{:<40}{}\n", headers[0], headers[1], headers[2]);
    for row in &view.rows {
        out.push_str(&format!(
            "{:<14}{:<40}{}\n",
            row.nomor_induk, row.nama_lengkap, row.usia
        ));
    }
    let meta = &view.meta;
    out.push_str(&format!(
        "Page {} of {} ({} students)\n",
        meta.current_page + 1,
        meta.total_pages.max(1),
        meta.total_items
    ));
    out
}

fn render_student(student: &Student) -> String {
    let last = student.nama_belakang.as_deref().unwrap_or("-");
    format!(
        "Student No.:   {}\n\
         First name:    {}\n\
         Last name:     {last}\n\
         Full name:     {}\n\
         Date of birth: {}\n\
         Age:           {} years\n\
         Created:       {}\n\
         Updated:       {}\n",
        student.nomor_induk,
        student.nama_depan,
        student.nama_lengkap,
        student.tanggal_lahir.format("%-d %B %Y"),
        student.usia,
        student.created_at.format("%-d %B %Y %H:%M"),
        student.updated_at.format("%-d %B %Y %H:%M"),
    )
}
