use super::args::{Args, Command, ConsultationAction, EditArgs, MaintenanceAction};
use super::output::{
    write_consultation, write_consultations, write_json, write_maintenance, write_report,
    write_view,
};
use super::CliError;
use crate::admin::ListController;
use crate::auth::{AdminGate, AuthError, SESSION_FILE};
use crate::catalog::{CatalogError, CategoryDraft, CategoryKind, Contact, ContactDraft};
use crate::config::{load_config, save_config, OrdoConfig};
use crate::consultation::{ConsultationDraft, ConsultationFilter, Inbox};
use crate::ordering::{OrderingError, OrderingService};
use crate::record::{GroupKey, OrderedRecord, RecordPatch};
use crate::store::FileStore;
use crate::utils::compute_hash;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything a command needs, resolved once from the data directory.
struct Context {
    data_dir: PathBuf,
    config: OrdoConfig,
    gate: AdminGate,
    json: bool,
}

impl Context {
    async fn load(args: &Args) -> Result<Self, CliError> {
        let data_dir = args.data_dir();
        let config = load_config(&data_dir).await?;
        let gate = AdminGate::new(config.auth.clone(), data_dir.join(SESSION_FILE))?;
        Ok(Self {
            data_dir,
            config,
            gate,
            json: args.json,
        })
    }

    fn service(&self) -> OrderingService<FileStore> {
        OrderingService::new(Arc::new(FileStore::new(self.data_dir.clone())))
            .with_sequencer(self.config.sequencing.sequencer())
            .with_retry(self.config.sequencing.retry_policy())
    }

    async fn controller(&self, group: GroupKey) -> Result<ListController<FileStore>, CliError> {
        let session = self.gate.require_session().await?;
        Ok(ListController::new(self.service(), group, session))
    }

    async fn controller_for(&self, raw: &str) -> Result<ListController<FileStore>, CliError> {
        self.controller(GroupKey::parse(raw)?).await
    }
}

/// Run one parsed command, writing its result to `out`.
#[instrument(name = "cli.run", skip_all, fields(data_dir = ?args.data_dir()))]
pub async fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let mut ctx = Context::load(args).await?;
    match &args.command {
        Command::Login { password } => {
            let session = ctx.gate.login(password).await?;
            let expires = session.expires_at().to_rfc3339();
            if ctx.json {
                write_json(out, &json!({ "authenticated": true, "expiresAt": expires }))
            } else {
                writeln!(out, "Logged in until {expires}")?;
                Ok(())
            }
        }
        Command::Logout => {
            ctx.gate.logout().await?;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        Command::SetPassword { password } => {
            set_password(&mut ctx, password).await?;
            writeln!(out, "Admin password updated, log in again")?;
            Ok(())
        }
        Command::List { group } => {
            let view = ctx.controller_for(group).await?.refresh().await?;
            if ctx.json {
                write_json(out, &view)
            } else {
                write_view(out, &view)
            }
        }
        Command::Maintenance { action } => maintenance(&mut ctx, action, out).await,
        Command::Consultations { action } => consultations(&ctx, action, out).await,
        command => list_action(&ctx, command, out).await,
    }
}

/// Commands that change a list and report through the controller.
async fn list_action<W: Write>(
    ctx: &Context,
    command: &Command,
    out: &mut W,
) -> Result<(), CliError> {
    let report = match command {
        Command::AddCategory {
            name,
            document_type,
            inactive,
            position,
        } => {
            let kind = if *document_type {
                CategoryKind::DocumentType
            } else {
                CategoryKind::Category
            };
            let mut draft = CategoryDraft::new(name);
            draft.active = !inactive;
            let record = draft.into_new_record(kind)?;
            let controller = ctx.controller(kind.group()).await?;
            match position {
                Some(position) => controller.create_at(record, *position).await?,
                None => controller.create(record).await?,
            }
        }
        Command::AddContact(contact) => {
            let record = ContactDraft::from(contact).into_new_record()?;
            let controller = ctx.controller(GroupKey::contacts()).await?;
            match contact.position {
                Some(position) => controller.create_at(record, position).await?,
                None => controller.create(record).await?,
            }
        }
        Command::Edit(edit) => {
            let controller = ctx.controller_for(&edit.group).await?;
            let current = controller
                .entry(&edit.id)
                .await?
                .ok_or_else(|| OrderingError::NotFound(edit.id.clone()))?;
            let patch = edit_patch(edit, &current)?;
            controller.edit(&edit.id, &patch).await?
        }
        Command::MoveUp { group, id } => ctx.controller_for(group).await?.move_up(id).await?,
        Command::MoveDown { group, id } => ctx.controller_for(group).await?.move_down(id).await?,
        Command::MoveTo {
            group,
            id,
            position,
        } => ctx.controller_for(group).await?.move_to(id, *position).await?,
        Command::Toggle { group, id } => ctx.controller_for(group).await?.toggle_active(id).await?,
        Command::Delete { group, id } => ctx.controller_for(group).await?.delete(id).await?,
        Command::Renumber { group } => ctx.controller_for(group).await?.renumber().await?,
        Command::Login { .. }
        | Command::Logout
        | Command::SetPassword { .. }
        | Command::List { .. }
        | Command::Maintenance { .. }
        | Command::Consultations { .. } => return Ok(()),
    };
    write_report(out, &report, ctx.json)
}

/// Patch for `edit`: contacts get their full detail set re-validated, every
/// other group only takes a new name.
fn edit_patch(edit: &EditArgs, current: &OrderedRecord) -> Result<RecordPatch, CliError> {
    if current.group == GroupKey::contacts() {
        let draft = edit.contact_draft(Contact::from_record(current)?);
        return Ok(draft.to_patch()?);
    }
    if edit.touches_contact_fields() {
        return Err(CatalogError::WrongGroup {
            expected: GroupKey::contacts().to_string(),
            actual: current.group.to_string(),
        }
        .into());
    }
    let draft = CategoryDraft {
        name: edit.name.clone().unwrap_or_else(|| current.name.clone()),
        active: current.active,
    };
    Ok(draft.to_patch()?)
}

/// Store a new password digest. The first password can be set freely; after
/// that a live session is required. Existing sessions end either way.
async fn set_password(ctx: &mut Context, password: &str) -> Result<(), CliError> {
    if password.trim().is_empty() {
        return Err(AuthError::EmptyPassword.into());
    }
    let configured = ctx
        .config
        .auth
        .password_sha256
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if configured {
        ctx.gate.require_session().await?;
    }
    ctx.config.auth.password_sha256 = Some(compute_hash(password));
    save_config(&ctx.data_dir, &ctx.config).await?;
    ctx.gate.logout().await?;
    info!("Admin password updated");
    Ok(())
}

async fn maintenance<W: Write>(
    ctx: &mut Context,
    action: &MaintenanceAction,
    out: &mut W,
) -> Result<(), CliError> {
    match action {
        MaintenanceAction::Show => {}
        MaintenanceAction::On | MaintenanceAction::Off => {
            ctx.gate.require_session().await?;
            let enabled = matches!(action, MaintenanceAction::On);
            ctx.config.maintenance.enabled = enabled;
            save_config(&ctx.data_dir, &ctx.config).await?;
            info!(enabled, "Maintenance mode changed");
        }
        MaintenanceAction::Set { field, value } => {
            ctx.gate.require_session().await?;
            ctx.config.maintenance.set((*field).into(), value);
            save_config(&ctx.data_dir, &ctx.config).await?;
            info!(field = ?field, "Maintenance text updated");
        }
    }
    write_maintenance(out, &ctx.config.maintenance, ctx.json)
}

async fn consultations<W: Write>(
    ctx: &Context,
    action: &ConsultationAction,
    out: &mut W,
) -> Result<(), CliError> {
    let inbox = Inbox::new(ctx.service());
    if let ConsultationAction::Submit {
        name,
        email,
        message,
    } = action
    {
        let created = inbox
            .submit(ConsultationDraft::new(name, email, message))
            .await?;
        if ctx.json {
            return write_json(out, &created);
        }
        writeln!(out, "Consultation received ({})", created.id)?;
        return Ok(());
    }

    let session = ctx.gate.require_session().await?;
    match action {
        ConsultationAction::List { status, search } => {
            let filter = ConsultationFilter {
                status: status.map(Into::into),
                search: search.clone(),
            };
            let listed = inbox.list(&session, &filter).await?;
            let counts = inbox.counts(&session).await?;
            write_consultations(out, &listed, &counts, ctx.json)
        }
        ConsultationAction::Show { id } => {
            let consultation = inbox.open(&session, id).await?;
            write_consultation(out, &consultation, ctx.json)
        }
        ConsultationAction::Mark { id, status } => {
            let consultation = inbox.set_status(&session, id, (*status).into()).await?;
            if ctx.json {
                return write_json(out, &consultation);
            }
            writeln!(out, "Consultation marked as {}", consultation.status)?;
            Ok(())
        }
        ConsultationAction::Delete { id } => {
            inbox.delete(&session, id).await?;
            writeln!(out, "Consultation deleted")?;
            Ok(())
        }
        ConsultationAction::Submit { .. } => Ok(()),
    }
}
