// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use leadboard_app::{Lead, LeadStore, OpportunityStore, ScoreBand};
use std::fmt::Write as _;

const HEADERS: [&str; 6] = ["ID", "NAME", "COMPANY", "STATUS", "SCORE", "SOURCE"];

/// Plain-text snapshot of both stores.
pub fn render_console(leads: &LeadStore, opportunities: &OpportunityStore) -> String {
    let mut out = String::new();
    render_leads(&mut out, leads);
    render_selection(&mut out, leads);
    render_opportunities(&mut out, opportunities);

    if let Some(error) = leads.error() {
        let _ = writeln!(out, "\nerror: {error}");
    }
    if let Some(error) = opportunities.error() {
        let _ = writeln!(out, "\nopportunity error: {error}");
    }
    out
}

fn render_leads(out: &mut String, leads: &LeadStore) {
    let filters = leads.filters();
    let pagination = leads.pagination();
    let _ = writeln!(
        out,
        "leads: page {} of {} ({} matching, {} total) sort {} {} status {}{}",
        pagination.current_page,
        pagination.total_pages,
        pagination.total_items,
        leads.leads().len(),
        filters.sort_by.as_str(),
        filters.sort_order.as_str(),
        filters.status.as_str(),
        if filters.search.is_empty() {
            String::new()
        } else {
            format!(" search {:?}", filters.search)
        },
    );

    let displayed = leads.displayed_leads();
    if displayed.is_empty() {
        let message = if leads.leads().is_empty() {
            "no leads"
        } else {
            "no leads match the current filters"
        };
        let _ = writeln!(out, "{message}");
        return;
    }

    let rows: Vec<[String; 6]> = displayed.iter().map(lead_row).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS.map(str::to_owned), &widths);
    for row in &rows {
        write_row(out, row, &widths);
    }
}

fn lead_row(lead: &Lead) -> [String; 6] {
    [
        lead.id.to_string(),
        lead.name.clone(),
        lead.company.clone(),
        lead.status.as_str().to_owned(),
        format!("{} {}", lead.score, ScoreBand::for_score(lead.score).label()),
        lead.source.clone(),
    ]
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn render_selection(out: &mut String, leads: &LeadStore) {
    let Some(lead) = leads.selected_lead() else {
        return;
    };
    let _ = writeln!(out, "\nselected: {} ({})", lead.name, lead.id);
    let _ = writeln!(out, "  company: {}", lead.company);
    let _ = writeln!(out, "  email:   {}", lead.email);
    let _ = writeln!(out, "  source:  {}", lead.source);
    let _ = writeln!(out, "  score:   {}", lead.score);
    let _ = writeln!(out, "  status:  {}", lead.status.as_str());
}

fn render_opportunities(out: &mut String, opportunities: &OpportunityStore) {
    let created = opportunities.opportunities();
    if created.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nopportunities ({}):", created.len());
    for opportunity in created {
        let amount = opportunity
            .amount_cents
            .map(format_cents)
            .unwrap_or_else(|| "-".to_owned());
        let _ = writeln!(
            out,
            "  {}  {}  {}  account {}  amount {}  from lead {}",
            opportunity.id,
            opportunity.name,
            opportunity.stage.as_str(),
            opportunity.account_name,
            amount,
            opportunity.created_from_lead,
        );
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
