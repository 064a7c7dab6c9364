use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::catalog::{Contact, ContactDraft};
use crate::config::MaintenanceField;
use crate::consultation::ConsultationStatus;

/// Ordo - ordered admin lists over a file-backed record store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Data directory (default: ~/.ordo)
    #[arg(long, env = "ORDO_HOME", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable JSON log format (for log aggregation)
    #[arg(long, env = "ORDO_LOG_JSON", default_value = "false", global = true)]
    pub log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "ORDO_LOG_ROTATION", default_value = "daily", global = true)]
    pub log_rotation: String,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::utils::data_dir)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an admin session
    Login {
        #[arg(long, env = "ORDO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the admin session
    Logout,
    /// Store the digest of a new admin password (requires a session once one is set)
    SetPassword {
        #[arg(long, env = "ORDO_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show a group in display order
    List { group: String },
    /// Add a category, or a document type with --document-type
    AddCategory {
        name: String,
        #[arg(long)]
        document_type: bool,
        #[arg(long)]
        inactive: bool,
        /// 1-based position (default: last)
        #[arg(long)]
        position: Option<usize>,
    },
    /// Add a team contact, at the end of the list unless --position is given
    AddContact(ContactArgs),
    /// Rename an entry or change contact details; omitted options keep their value
    Edit(EditArgs),
    MoveUp { group: String, id: String },
    MoveDown { group: String, id: String },
    /// Move an entry to a 1-based position
    MoveTo {
        group: String,
        id: String,
        position: usize,
    },
    /// Flip an entry between active and inactive
    Toggle { group: String, id: String },
    Delete { group: String, id: String },
    /// Respace every ordinal of a group
    Renumber { group: String },
    /// Inspect or change the maintenance page
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceAction,
    },
    /// Submit, review and answer visitor consultations
    Consultations {
        #[command(subcommand)]
        action: ConsultationAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConsultationAction {
    /// Send a consultation as a visitor (no session needed)
    Submit {
        name: String,
        email: String,
        message: String,
    },
    /// Newest first, optionally narrowed by status or a search term
    List {
        #[arg(long)]
        status: Option<StatusArg>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one consultation, marking it read if it was pending
    Show { id: String },
    Mark { id: String, status: StatusArg },
    Delete { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Read,
    Replied,
}

impl From<StatusArg> for ConsultationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => ConsultationStatus::Pending,
            StatusArg::Read => ConsultationStatus::Read,
            StatusArg::Replied => ConsultationStatus::Replied,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceAction {
    Show,
    On,
    Off,
    /// Set one text of the maintenance page; an empty value restores the default
    Set {
        field: MaintenanceFieldArg,
        value: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceFieldArg {
    Title,
    Message,
    TimeMessage,
    FooterMessage,
    CompanyName,
}

impl From<MaintenanceFieldArg> for MaintenanceField {
    fn from(value: MaintenanceFieldArg) -> Self {
        match value {
            MaintenanceFieldArg::Title => MaintenanceField::Title,
            MaintenanceFieldArg::Message => MaintenanceField::Message,
            MaintenanceFieldArg::TimeMessage => MaintenanceField::TimeMessage,
            MaintenanceFieldArg::FooterMessage => MaintenanceField::FooterMessage,
            MaintenanceFieldArg::CompanyName => MaintenanceField::CompanyName,
        }
    }
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ContactArgs {
    pub name: String,
    pub email: String,
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub photo_url: Option<String>,
    #[arg(long)]
    pub linkedin_url: Option<String>,
    #[arg(long)]
    pub instagram_url: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub services_link: Option<String>,
    #[arg(long)]
    pub services_description: Option<String>,
    #[arg(long)]
    pub inactive: bool,
    /// 1-based position (default: last)
    #[arg(long)]
    pub position: Option<usize>,
}

impl From<&ContactArgs> for ContactDraft {
    fn from(args: &ContactArgs) -> Self {
        Self {
            job_title: args.job_title.clone(),
            photo_url: args.photo_url.clone(),
            linkedin_url: args.linkedin_url.clone(),
            instagram_url: args.instagram_url.clone(),
            bio: args.bio.clone(),
            services_link: args.services_link.clone(),
            services_description: args.services_description.clone(),
            active: !args.inactive,
            ..ContactDraft::new(&args.name, &args.email)
        }
    }
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct EditArgs {
    pub group: String,
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Contact fields below accept an empty value to clear them
    #[arg(long)]
    pub job_title: Option<String>,
    #[arg(long)]
    pub photo_url: Option<String>,
    #[arg(long)]
    pub linkedin_url: Option<String>,
    #[arg(long)]
    pub instagram_url: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub services_link: Option<String>,
    #[arg(long)]
    pub services_description: Option<String>,
}

impl EditArgs {
    /// Whether any option only makes sense for a contact was given.
    #[must_use]
    pub fn touches_contact_fields(&self) -> bool {
        [
            &self.email,
            &self.job_title,
            &self.photo_url,
            &self.linkedin_url,
            &self.instagram_url,
            &self.bio,
            &self.services_link,
            &self.services_description,
        ]
        .iter()
        .any(|value| value.is_some())
    }

    /// Contact draft with the given options laid over `current`.
    #[must_use]
    pub fn contact_draft(&self, current: Contact) -> ContactDraft {
        ContactDraft {
            name: self.name.clone().unwrap_or(current.name),
            email: self.email.clone().unwrap_or(current.email),
            job_title: self.job_title.clone().or(Some(current.job_title)),
            photo_url: self.photo_url.clone().or(current.photo_url),
            linkedin_url: self.linkedin_url.clone().or(current.linkedin_url),
            instagram_url: self.instagram_url.clone().or(current.instagram_url),
            bio: self.bio.clone().or(current.bio),
            services_link: self.services_link.clone().or(current.services_link),
            services_description: self
                .services_description
                .clone()
                .or(current.services_description),
            active: current.active,
        }
    }
}
