// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use leadboard_app::{
    FilterPatch, LeadCommand, LeadFieldEdit, LeadId, OpportunityCommand, OpportunityStage,
    OpportunityUpdate,
};
use leadboard_console::{Backend, Console};

/// Commands requested on the command line, applied after the initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRequest {
    pub filters: FilterPatch,
    pub page: Option<usize>,
    pub select: Option<LeadId>,
    pub edits: Vec<LeadFieldEdit>,
    pub convert: bool,
    /// Stage for the opportunity created by `convert`.
    pub stage: Option<OpportunityStage>,
}

/// Loads leads, then applies filters, paging, selection, edits and conversion
/// in that order. A requested stage is applied to the new opportunity. Returns
/// one notice per outcome; failed edits and conversions are reported, not
/// fatal.
pub async fn run_session<B: Backend>(
    console: &mut Console<B>,
    request: &SessionRequest,
) -> Result<Vec<String>> {
    console.load_leads().await;

    if request.filters != FilterPatch::default() {
        console
            .leads_mut()
            .dispatch(LeadCommand::SetFilters(request.filters.clone()));
    }
    if let Some(page) = request.page {
        console.leads_mut().dispatch(LeadCommand::SetPage(page));
    }

    if let Some(id) = &request.select {
        let lead = console
            .leads()
            .lead(id)
            .cloned()
            .ok_or_else(|| anyhow!("no lead with id {id}; check the id column of the listing"))?;
        console
            .leads_mut()
            .dispatch(LeadCommand::SelectLead(Some(lead)));
    }

    let mut notices = Vec::new();
    for edit in &request.edits {
        let field = edit.field().as_str();
        match console.save_lead_edit(edit.clone()).await {
            Ok(()) => notices.push(format!("saved {field}")),
            Err(error) => notices.push(format!("{field} not saved: {error}")),
        }
    }

    if request.convert {
        match console.convert_selected_lead().await {
            Ok(opportunity) => {
                notices.push(format!(
                    "converted lead {} into opportunity {}",
                    opportunity.created_from_lead, opportunity.id
                ));
                if let Some(stage) = request.stage {
                    console
                        .opportunities_mut()
                        .dispatch(OpportunityCommand::UpdateOpportunity {
                            id: opportunity.id.clone(),
                            updates: OpportunityUpdate {
                                stage: Some(stage),
                                amount_cents: None,
                            },
                        });
                    notices.push(format!(
                        "opportunity {} moved to {}",
                        opportunity.id,
                        stage.as_str()
                    ));
                }
            }
            Err(error) => notices.push(format!("conversion failed: {error}")),
        }
    }

    Ok(notices)
}
