//! Listing Wizard Simulator
//!
//! Runs one scripted wizard session against the in-memory collaborators and
//! prints what happened: the outcome of every scripted action, the final
//! session state and the ordered list of collaborator calls.
//!
//! ```text
//! listing-wizard --category flat complete:photos complete:price slide:2 back publish
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use listing_wizard_shared::config::{default_config_path, WizardConfig};
use listing_wizard_shared::core::{
    EntryKind, InMemoryOptions, InMemoryServices, ServiceError, StepId, WizardController,
    WizardState,
};
use listing_wizard_shared::logging::{init_logging, LoggingConfig};
use listing_wizard_shared::models::{Item, User};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Category type name of the draft ("flat", "share", ...)
    #[arg(long)]
    category: Option<String>,

    /// Edit an existing item instead of creating one
    #[arg(long)]
    edit: bool,

    /// Session opened straight from the first-choice category picker
    #[arg(long)]
    first_choice: bool,

    /// Simulate a restart during photo picking
    #[arg(long)]
    recover_photo: bool,

    /// Mark the user profile as modified so publish saves it
    #[arg(long)]
    profile_modified: bool,

    /// Make the profile save fail
    #[arg(long)]
    fail_profile: bool,

    /// Make the item save fail
    #[arg(long)]
    fail_item: bool,

    /// Actions: complete:<step>, slide:<index>, back, publish, detail, leave, enter
    actions: Vec<Action>,
}

/// One scripted user or platform action
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Complete(StepId),
    Slide(usize),
    Back,
    Publish,
    Detail,
    Leave,
    Enter,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, argument) = match s.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (s, None),
        };

        match (name, argument) {
            ("complete", Some(step)) => StepId::from_name(step)
                .map(Action::Complete)
                .ok_or_else(|| format!("unknown step '{step}'")),
            ("slide", Some(index)) => index
                .parse()
                .map(Action::Slide)
                .map_err(|_| format!("invalid slide index '{index}'")),
            ("back", None) => Ok(Action::Back),
            ("publish", None) => Ok(Action::Publish),
            ("detail", None) => Ok(Action::Detail),
            ("leave", None) => Ok(Action::Leave),
            ("enter", None) => Ok(Action::Enter),
            _ => Err(format!("unknown action '{s}'")),
        }
    }
}

#[derive(Debug, Serialize)]
struct ActionReport {
    action: String,
    result: String,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    entry: String,
    actions: Vec<ActionReport>,
    state: WizardState,
    calls: Vec<String>,
}

fn load_config(path: Option<PathBuf>) -> Result<WizardConfig> {
    match path {
        Some(path) => WizardConfig::load(&path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let path = default_config_path();
            if !path.exists() {
                return Ok(WizardConfig::default());
            }
            Ok(WizardConfig::load(&path).unwrap_or_else(|e| {
                warn!("Failed to load config from {:?}: {}. Using defaults.", path, e);
                WizardConfig::default()
            }))
        }
    }
}

fn build_services(args: &Args, config: &WizardConfig) -> InMemoryServices {
    let item = match &args.category {
        Some(category) => Item::with_category(category.as_str()),
        None => Item::new(),
    };

    let mut user = User::new("Simulated user");
    user.modified = args.profile_modified || args.fail_profile;

    let services = InMemoryServices::new(InMemoryOptions {
        item,
        user,
        edit_mode: args.edit,
        first_choice: args.first_choice,
        photo_recovery: args.recover_photo,
        wizard_path: config.routes.wizard.clone(),
    });

    if args.fail_profile {
        services
            .profile
            .fail_saves_with(ServiceError::new("simulated profile failure").with_status(500));
    }
    if args.fail_item {
        services
            .draft
            .fail_saves_with(ServiceError::new("simulated item failure").with_status(503));
    }
    services
}

fn describe_entry(entry: EntryKind) -> String {
    match entry {
        EntryKind::AlreadyDone => "already_done".to_string(),
        EntryKind::Recovered { index } => format!("recovered at slide {index}"),
        EntryKind::Fresh => "fresh".to_string(),
    }
}

async fn run_action(wizard: &mut WizardController, action: &Action) -> String {
    match action {
        Action::Complete(step) => {
            let transition = wizard.complete_step(*step).await;
            match transition.activated {
                Some(next) if transition.newly_activated => format!("activated {next}"),
                Some(next) => format!("{next} already active"),
                None => "no successor".to_string(),
            }
        }
        Action::Slide(index) => {
            if wizard.slide_changed(*index) {
                format!("slide {index}")
            } else {
                format!("slide {index} is not mounted")
            }
        }
        Action::Back => format!("{:?}", wizard.handle_back_signal().await),
        Action::Publish => match wizard.publish().await {
            Ok(item) => format!("published {}", item.id.unwrap_or_default()),
            Err(e) => format!("failed: {e}"),
        },
        Action::Detail => {
            if wizard.view_published_item().await {
                "opened item detail".to_string()
            } else {
                "not published yet".to_string()
            }
        }
        Action::Leave => {
            wizard.did_leave();
            "left".to_string()
        }
        Action::Enter => {
            wizard.will_enter().await;
            describe_entry(wizard.did_enter().await)
        }
    }
}

async fn simulate(args: Args, config: WizardConfig) -> Result<SessionReport> {
    if args.fail_profile && !args.actions.contains(&Action::Publish) {
        bail!("--fail-profile has no effect without a 'publish' action");
    }

    let services = build_services(&args, &config);
    let mut wizard = WizardController::new(services.services(), config);

    wizard.will_enter().await;
    let entry = describe_entry(wizard.did_enter().await);
    info!(entry, "Simulated session entered");

    let mut actions = Vec::with_capacity(args.actions.len());
    for action in &args.actions {
        let result = run_action(&mut wizard, action).await;
        info!(?action, result, "Action applied");
        actions.push(ActionReport {
            action: format!("{action:?}"),
            result,
        });
    }

    Ok(SessionReport {
        entry,
        actions,
        state: wizard.state().clone(),
        calls: services.log.entries(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.clone())?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_logging(LoggingConfig::from_settings(&config.logging).with_debug(args.debug));
    info!("Starting listing wizard simulator v{}", env!("CARGO_PKG_VERSION"));

    let report = simulate(args, config).await?;
    let yaml = serde_yaml::to_string(&report).context("Failed to serialize session report")?;
    println!("{yaml}");
    Ok(())
}
