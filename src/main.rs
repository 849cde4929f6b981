//! Becas CLI
//!
//! Drives the portal against a file-backed store. Every invocation is one
//! action; the session survives between runs in `currentUser.json`.

use anyhow::{bail, Context};
use becas::config::{generate_default_config, PortalConfig};
use becas::portal::{Action, CallForm, DashboardView, Modal, Notice, Portal};
use becas::storage::{
    ApplicationStatus, Call, CallStatus, EntityId, EntityStore, FileStorage,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "becas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scholarship and subsidy management portal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load demo data into empty collections
    Seed,

    /// Start a session
    Login { email: String, password: String },

    /// End the current session
    Logout,

    /// Create an applicant account
    Register {
        nombre: String,
        email: String,
        password: String,
    },

    /// Show the logged-in user
    Whoami,

    /// Print the current screen as HTML
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Application totals and approval rate (Admin)
    Report,

    /// Manage calls
    #[command(subcommand)]
    Calls(CallsCommand),

    /// Apply to a call (Postulante)
    Apply { call_id: u64 },

    /// Set an application's state (Evaluador or Admin)
    Evaluate {
        application_id: u64,
        /// Apta, Aprobada or Rechazada
        estado: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CallsCommand {
    /// List the calls your dashboard shows (all for Admin, open ones for Postulante)
    List,

    /// Publish a new call (Admin)
    Create {
        titulo: String,
        #[arg(long, default_value = "")]
        tipo: String,
        /// Closing date, YYYY-MM-DD
        #[arg(long, default_value = "")]
        cierre: String,
        #[arg(long, default_value = "")]
        descripcion: String,
    },

    /// Edit a call (Admin); omitted fields keep their value
    Update {
        id: u64,
        #[arg(long)]
        titulo: Option<String>,
        #[arg(long)]
        tipo: Option<String>,
        #[arg(long)]
        cierre: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
        /// Abierta or Cerrada
        #[arg(long)]
        estado: Option<String>,
    },

    /// Remove a call (Admin)
    Delete { id: u64 },
}

type CliPortal = Portal<FileStorage>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => PortalConfig::load_with_env(path)
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => PortalConfig::load_default(),
    };

    becas::logging::init(&loaded.config.logging).context("Installing log subscriber")?;
    loaded.log();

    let mut config = loaded.config;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    if let Commands::Config { output } = &cli.command {
        return emit(&generate_default_config(), output.as_ref());
    }

    let data_dir = config.data_dir();
    tracing::debug!("Data directory: {:?}", data_dir);
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("Opening data directory {}", data_dir.display()))?;
    let mut store = EntityStore::new(storage);

    if let Commands::Seed = cli.command {
        let report = becas::seed_system(&mut store)?;
        if report.is_empty() {
            println!("Nothing to seed, all collections already hold data.");
        } else {
            println!("Demo data {}", report);
        }
        println!("Store: {}", store.stats()?);
        return Ok(());
    }

    let mut portal = if config.seed.enabled {
        Portal::boot(store)?.0
    } else {
        Portal::new(store)
    };

    run(&mut portal, cli.command)
}

fn run(portal: &mut CliPortal, command: Commands) -> anyhow::Result<()> {
    match command {
        // Both run in main before the portal exists
        Commands::Seed | Commands::Config { .. } => {}

        Commands::Login { email, password } => {
            portal.dispatch(Action::Login { email, password })?;
            settle(portal)?;
            if let Some(user) = portal.session()? {
                println!("Logged in as {} ({})", user.name, user.role);
            }
        }

        Commands::Logout => {
            portal.dispatch(Action::Logout)?;
            println!("Logged out.");
        }

        Commands::Register {
            nombre,
            email,
            password,
        } => {
            portal.dispatch(Action::Register {
                name: nombre,
                email,
                password,
            })?;
            settle(portal)?;
        }

        Commands::Whoami => match portal.session()? {
            Some(user) => println!("{} <{}> [{}]", user.name, user.email, user.role),
            None => println!("Not logged in."),
        },

        Commands::Render { output } => {
            let html = portal.render()?;
            emit(&html, output.as_ref())?;
        }

        Commands::Report => {
            let DashboardView::Admin(dashboard) = portal.view()? else {
                bail!("{}", Notice::NotAllowed);
            };
            let report = dashboard.report;
            println!("Total applications: {}", report.total);
            println!("Approved: {}", report.approved);
            println!("Approval rate: {:.1}%", report.approval_rate());
        }

        Commands::Calls(command) => run_calls(portal, command)?,

        Commands::Apply { call_id } => {
            portal.dispatch(Action::ApplyToCall(EntityId(call_id)))?;
            settle(portal)?;
            if portal.modal().is_none() {
                bail!("Call {} not found", call_id);
            }
            portal.dispatch(Action::SubmitApplication {
                call_id: EntityId(call_id),
            })?;
            settle(portal)?;
            println!("Application submitted.");
        }

        Commands::Evaluate {
            application_id,
            estado,
        } => {
            let id = EntityId(application_id);
            portal.dispatch(Action::OpenEvaluation(id))?;
            settle(portal)?;
            if portal.modal().is_none() {
                bail!("Application {} not found", application_id);
            }
            let status = ApplicationStatus::from(estado);
            if !ApplicationStatus::evaluation_choices().contains(&status) {
                bail!("Unknown state {:?}; expected Apta, Aprobada or Rechazada", status.as_str());
            }
            portal.dispatch(Action::SubmitEvaluation {
                application_id: id,
                status: status.clone(),
            })?;
            settle(portal)?;
            println!("Application {} is now {}.", application_id, status);
        }
    }

    Ok(())
}

fn run_calls(portal: &mut CliPortal, command: CallsCommand) -> anyhow::Result<()> {
    match command {
        CallsCommand::List => {
            let view = portal.view()?;
            let Some(calls) = view.visible_calls() else {
                bail!("{}", Notice::NotAllowed);
            };
            if calls.is_empty() {
                println!("No calls to show.");
                return Ok(());
            }
            println!("{:<15} {:<32} {:<12} {:<12} {}", "ID", "Title", "Type", "Closes", "Status");
            println!("{}", "-".repeat(82));
            for call in calls {
                println!(
                    "{:<15} {:<32} {:<12} {:<12} {}",
                    call.id, call.title, call.kind, call.closing_date, call.status
                );
            }
        }

        CallsCommand::Create {
            titulo,
            tipo,
            cierre,
            descripcion,
        } => {
            portal.dispatch(Action::NewCall)?;
            settle(portal)?;
            portal.dispatch(Action::SubmitCall(CallForm {
                title: titulo,
                kind: tipo,
                closing_date: cierre,
                description: descripcion,
                ..CallForm::blank()
            }))?;
            settle(portal)?;
            println!("Call \"{}\" created.", title_of_last(portal)?);
        }

        CallsCommand::Update {
            id,
            titulo,
            tipo,
            cierre,
            descripcion,
            estado,
        } => {
            portal.dispatch(Action::EditCall(EntityId(id)))?;
            settle(portal)?;
            let Some(Modal::Call(mut form)) = portal.modal().cloned() else {
                bail!("Call {} not found", id);
            };
            if let Some(title) = titulo {
                form.title = title;
            }
            if let Some(kind) = tipo {
                form.kind = kind;
            }
            if let Some(date) = cierre {
                form.closing_date = date;
            }
            if let Some(description) = descripcion {
                form.description = description;
            }
            if let Some(status) = estado {
                form.status = CallStatus::from(status);
            }
            portal.dispatch(Action::SubmitCall(form))?;
            settle(portal)?;
            println!("Call {} updated.", id);
        }

        CallsCommand::Delete { id } => {
            let existed = portal.store().get_by_id::<Call>(id)?.is_some();
            portal.dispatch(Action::DeleteCall(EntityId(id)))?;
            settle(portal)?;
            if existed {
                println!("Call {} deleted.", id);
            } else {
                println!("Call {} did not exist.", id);
            }
        }
    }

    Ok(())
}

/// Surface the notice raised by the last action. Anything but a
/// confirmation fails the command.
fn settle(portal: &mut CliPortal) -> anyhow::Result<()> {
    match portal.take_notice() {
        None => Ok(()),
        Some(Notice::Registered) => {
            println!("{}", Notice::Registered);
            Ok(())
        }
        Some(notice) => bail!("{}", notice),
    }
}

fn title_of_last(portal: &CliPortal) -> anyhow::Result<String> {
    let calls = portal.store().get_all::<Call>()?;
    Ok(calls.into_iter().max_by_key(|c| c.id).map(|c| c.title).unwrap_or_default())
}

fn emit(text: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
