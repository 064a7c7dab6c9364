//! Plain-text and JSON rendering of command results.
use super::CliError;
use crate::admin::{ActionReport, ListView};
use crate::config::MaintenanceConfig;
use crate::consultation::{Consultation, StatusCounts};
use serde_json::json;
use serde::Serialize;
use std::io::Write;

pub(super) fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub(super) fn write_view<W: Write>(out: &mut W, view: &ListView) -> Result<(), CliError> {
    if view.rows.is_empty() {
        writeln!(out, "No entries in '{}'", view.group)?;
        return Ok(());
    }
    let width = view
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    writeln!(out, "{:>3}  {:<width$}  {:<8}  {:>8}  ID", "#", "NAME", "ACTIVE", "ORDINAL")?;
    for row in &view.rows {
        let active = if row.active { "yes" } else { "no" };
        writeln!(
            out,
            "{:>3}  {:<width$}  {:<8}  {:>8}  {}",
            row.position, row.name, active, row.ordinal, row.id
        )?;
    }
    Ok(())
}

/// Print a report. A failure notice still shows the refreshed list before
/// turning into an error.
pub(super) fn write_report<W: Write>(
    out: &mut W,
    report: &ActionReport,
    json: bool,
) -> Result<(), CliError> {
    if json {
        write_json(out, report)?;
    } else {
        if !report.notice.is_error() {
            writeln!(out, "{}", report.notice.message)?;
        }
        write_view(out, &report.view)?;
    }
    if report.notice.is_error() {
        return Err(CliError::Rejected(report.notice.message.clone()));
    }
    Ok(())
}

pub(super) fn write_maintenance<W: Write>(
    out: &mut W,
    maintenance: &MaintenanceConfig,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, maintenance);
    }
    let state = if maintenance.enabled { "on" } else { "off" };
    writeln!(out, "maintenance:    {state}")?;
    writeln!(out, "title:          {}", maintenance.title)?;
    writeln!(out, "message:        {}", maintenance.message)?;
    writeln!(out, "time-message:   {}", maintenance.time_message)?;
    writeln!(out, "footer-message: {}", maintenance.footer_message)?;
    writeln!(out, "company-name:   {}", maintenance.company_name)?;
    Ok(())
}

pub(super) fn write_consultations<W: Write>(
    out: &mut W,
    listed: &[Consultation],
    counts: &StatusCounts,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, &json!({ "counts": counts, "consultations": listed }));
    }
    writeln!(
        out,
        "{} pending, {} read, {} replied",
        counts.pending, counts.read, counts.replied
    )?;
    if listed.is_empty() {
        writeln!(out, "No consultations")?;
        return Ok(());
    }
    for c in listed {
        writeln!(
            out,
            "{}  {:<8}  {} <{}>  {}",
            c.created_at.format("%Y-%m-%d %H:%M"),
            c.status.as_str(),
            c.name,
            c.email,
            c.id
        )?;
    }
    Ok(())
}

pub(super) fn write_consultation<W: Write>(
    out: &mut W,
    consultation: &Consultation,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return write_json(out, consultation);
    }
    writeln!(out, "from:     {} <{}>", consultation.name, consultation.email)?;
    writeln!(out, "received: {}", consultation.created_at.to_rfc3339())?;
    writeln!(out, "status:   {}", consultation.status)?;
    writeln!(out)?;
    writeln!(out, "{}", consultation.message)?;
    Ok(())
}
