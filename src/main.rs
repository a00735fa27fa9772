use std::error::Error;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use structopt::StructOpt;

use checkin::config::{Settings, ADMIN_CODE};
use checkin::delivery::local::{DirectoryDownloader, DirectoryShare, LocalFileSystem};
use checkin::delivery::{self, Capabilities};
use checkin::environment::{Config, Environment};
use checkin::roster::RosterStore;
use checkin::screens::{self, AttendeeList, SubmitOutcome};
use checkin::session::AttendeeForm;
use checkin::store::FileStore;
use checkin::ui::{ExportChoice, Notice, Route, Ui};
use checkin::{csv, diagnostics};
use log::{info, initialize_logger};

#[derive(Debug, StructOpt)]
#[structopt(name = "checkin", about = "Check attendees in to a class and export the roster")]
enum Opt {
    /// Start a new class, replacing the current one
    Setup {
        /// The name of the class
        name: String,

        /// The scheduled start, e.g. 09:00 or 0900
        #[structopt(long, default_value = "09:00")]
        start: String,

        /// The scheduled end, e.g. 17:00 or 1700
        #[structopt(long, default_value = "17:00")]
        end: String,
    },

    /// Check an attendee in to the current class
    CheckIn {
        #[structopt(long)]
        full_name: String,

        #[structopt(long)]
        email: String,

        #[structopt(long, default_value = "")]
        company: String,

        #[structopt(long, default_value = "")]
        phone: String,

        /// The attendee wants to hear about future classes
        #[structopt(long)]
        interested: bool,
    },

    /// List everyone checked in so far
    List,

    /// Export the roster as CSV (requires the admin code)
    Export {
        #[structopt(long)]
        code: String,
    },

    /// Clear the current class (requires the admin code)
    NewClass {
        #[structopt(long)]
        code: String,

        /// Export the roster before clearing it
        #[structopt(long)]
        export: bool,
    },

    /// Check that exports can be written on this machine
    Doctor,
}

/// Prints notices to the terminal and answers prompts from the command
/// line.
struct ConsoleUi {
    export_choice: ExportChoice,
}

impl Ui for ConsoleUi {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            eprintln!("{}", notice);
        } else {
            println!("{}", notice);
        }
    }

    fn navigate(&self, route: Route) {
        match route {
            Route::ClassSetup => println!("Next: checkin setup <class name>"),
            Route::CheckIn => println!("Next: checkin check-in --full-name <name> --email <email>"),
            Route::AttendeeList => println!("Next: checkin list"),
        }
    }

    fn choose_export_before_clear(&self) -> BoxFuture<ExportChoice> {
        future::ready(self.export_choice).boxed()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let opt = Opt::from_args();
    let settings = Settings::from_env()?;

    // the logger has to be gone before exiting so its async drain flushes
    if !run(opt, settings).await {
        std::process::exit(1);
    }

    Ok(())
}

async fn run(opt: Opt, settings: Settings) -> bool {
    let logger = Arc::new(initialize_logger());

    info!(logger, "Starting..."; "platform" => format!("{:?}", settings.platform), "data" => settings.data_directory.display().to_string());

    let files = Arc::new(LocalFileSystem::new(Some(settings.scratch_directory.clone())));
    let roster = RosterStore::new(Arc::new(FileStore::new(&settings.data_directory)));
    let delivery = delivery::for_platform(
        settings.platform,
        logger.clone(),
        Capabilities {
            downloader: Arc::new(DirectoryDownloader::new(&settings.download_directory)),
            files: files.clone(),
            share_sheet: Arc::new(DirectoryShare::new(&settings.share_directory)),
        },
    );

    let export_choice = match opt {
        Opt::NewClass { export: true, .. } => ExportChoice::ExportThenClear,
        _ => ExportChoice::ClearOnly,
    };
    let ui = Arc::new(ConsoleUi { export_choice });

    let environment = Environment::new(logger.clone(), roster.clone(), delivery, ui, Config::new(ADMIN_CODE));

    let succeeded = match opt {
        Opt::Setup { name, start, end } => screens::start_class(&environment, &name, &start, &end)
            .await
            .is_ok(),
        Opt::CheckIn {
            full_name,
            email,
            company,
            phone,
            interested,
        } => {
            let form = AttendeeForm {
                full_name,
                company_name: company,
                email,
                phone_number: phone,
                interested_in_future_classes: interested,
            };

            screens::check_in(&environment, form).await.is_ok()
        }
        Opt::List => {
            let roster = AttendeeList::new(environment).mount().await;
            print_roster(&roster);
            true
        }
        Opt::Export { code } => run_admin_action(environment, &code, AttendeeList::request_export).await,
        Opt::NewClass { code, .. } => {
            run_admin_action(environment, &code, AttendeeList::request_new_class).await
        }
        Opt::Doctor => {
            let report = diagnostics::run(&logger, &*files, &roster).await;
            print!("{}", report);
            report.passed()
        }
    };

    info!(logger, "Exiting..."; "succeeded" => succeeded);

    succeeded
}

/// Drives the attendee list's admin prompt the way a person at the
/// screen would: open it, type the code, submit, and take up the retry
/// offer once if the export fails.
async fn run_admin_action(environment: Environment, code: &str, request: fn(&AttendeeList) -> bool) -> bool {
    let screen = AttendeeList::new(environment);
    screen.mount().await;

    request(&screen);
    screen.enter_code(code);

    match screen.submit().await {
        Ok(SubmitOutcome::Rejected) | Ok(SubmitOutcome::Ignored) => false,
        Ok(_) => true,
        Err(_) if screen.can_retry_export() => matches!(screen.retry_export().await, Some(Ok(_))),
        Err(_) => false,
    }
}

fn print_roster(roster: &screens::Roster) {
    if roster.class_name.is_empty() {
        println!("No class is active");
        return;
    }

    println!("{} ({} checked in)", roster.class_name, roster.attendees.len());

    for attendee in &roster.attendees {
        let interested = if attendee.interested_in_future_classes {
            "  [interested in future classes]"
        } else {
            ""
        };

        println!(
            "  {}  {} <{}>{}",
            csv::format_check_in_time(&attendee.timestamp),
            attendee.full_name,
            attendee.email,
            interested
        );
    }
}
