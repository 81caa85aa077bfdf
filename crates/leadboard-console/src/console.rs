// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use leadboard_app::{
    Lead, LeadCommand, LeadFieldEdit, LeadId, LeadStore, LeadUpdate, Opportunity,
    OpportunityCommand, OpportunityStore,
};

use crate::Backend;

/// Both stores plus the backend that feeds them. The async operations here are
/// the only places a store is driven from a backend result.
pub struct Console<B> {
    leads: LeadStore,
    opportunities: OpportunityStore,
    backend: B,
}

impl<B: Backend> Console<B> {
    pub fn new(leads: LeadStore, backend: B) -> Self {
        Self {
            leads,
            opportunities: OpportunityStore::new(),
            backend,
        }
    }

    pub fn leads(&self) -> &LeadStore {
        &self.leads
    }

    pub fn leads_mut(&mut self) -> &mut LeadStore {
        &mut self.leads
    }

    pub fn opportunities(&self) -> &OpportunityStore {
        &self.opportunities
    }

    pub fn opportunities_mut(&mut self) -> &mut OpportunityStore {
        &mut self.opportunities
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Failures land in the lead store's error; the previous leads stay.
    pub async fn load_leads(&mut self) {
        self.leads.dispatch(LeadCommand::LoadStarted);
        match self.backend.fetch_leads().await {
            Ok(leads) => {
                tracing::info!(count = leads.len(), "leads loaded");
                self.leads.dispatch(LeadCommand::LoadSucceeded(leads));
            }
            Err(error) => {
                tracing::warn!("lead load failed: {error:#}");
                self.leads
                    .dispatch(LeadCommand::LoadFailed(Some(error.to_string())));
            }
        }
    }

    /// Confirms an already-applied optimistic update. On rejection the error
    /// is recorded and returned; rolling back is the caller's job.
    pub async fn update_lead(&mut self, id: &LeadId, updates: &LeadUpdate) -> Result<LeadUpdate> {
        self.leads.dispatch(LeadCommand::UpdateStarted);
        match self.backend.confirm_lead_update(id, updates).await {
            Ok(accepted) => Ok(accepted),
            Err(error) => {
                self.leads
                    .dispatch(LeadCommand::UpdateRejected(error.to_string()));
                Err(error)
            }
        }
    }

    pub async fn create_opportunity(&mut self, lead: &Lead) -> Result<Opportunity> {
        self.opportunities.dispatch(OpportunityCommand::CreateStarted);
        match self.backend.create_opportunity(lead).await {
            Ok(opportunity) => {
                self.opportunities
                    .dispatch(OpportunityCommand::CreateSucceeded(opportunity.clone()));
                Ok(opportunity)
            }
            Err(error) => {
                self.opportunities
                    .dispatch(OpportunityCommand::CreateFailed(Some(error.to_string())));
                Err(error)
            }
        }
    }

    /// Saves one field of the selected lead: optimistic apply, confirm, and
    /// roll back to the pre-edit snapshot if the backend rejects it.
    pub async fn save_lead_edit(&mut self, edit: LeadFieldEdit) -> Result<()> {
        if edit.is_blank() {
            return Ok(());
        }
        edit.validate()?;

        let snapshot = self
            .leads
            .selected_lead()
            .cloned()
            .ok_or_else(|| anyhow!("no lead selected"))?;
        let id = snapshot.id.clone();
        let updates = edit.to_update();

        self.leads.dispatch(LeadCommand::UpdateLeadOptimistic {
            id: id.clone(),
            updates: updates.clone(),
        });

        if let Err(error) = self.update_lead(&id, &updates).await {
            tracing::warn!(lead = %id, field = edit.field().as_str(), "edit rolled back: {error:#}");
            self.leads.dispatch(LeadCommand::RollbackLeadUpdate {
                id,
                original: snapshot,
            });
            return Err(error);
        }
        Ok(())
    }

    /// Turns the selected lead into an opportunity. The lead leaves the list
    /// and the panel closes only once creation succeeds.
    pub async fn convert_selected_lead(&mut self) -> Result<Opportunity> {
        let Some(lead) = self.leads.selected_lead().cloned() else {
            bail!("no lead selected");
        };
        if !lead.status.is_convertible() {
            bail!(
                "lead {} is {} and cannot be converted",
                lead.id,
                lead.status.as_str()
            );
        }

        let opportunity = self.create_opportunity(&lead).await?;
        self.leads.dispatch(LeadCommand::RemoveLead(lead.id.clone()));
        self.leads.dispatch(LeadCommand::CloseDetailPanel);
        tracing::info!(lead = %lead.id, opportunity = %opportunity.id, "lead converted");
        Ok(opportunity)
    }

    /// Puts the lead store into a failed-load state without a round trip.
    pub fn simulate_load_error(&mut self, message: impl Into<String>) {
        self.leads.dispatch(LeadCommand::LoadStarted);
        self.leads
            .dispatch(LeadCommand::LoadFailed(Some(message.into())));
    }

    /// Replaces the list with nothing, as if the source had no leads.
    pub fn simulate_empty_state(&mut self) {
        self.leads.dispatch(LeadCommand::LoadStarted);
        self.leads.dispatch(LeadCommand::LoadSucceeded(Vec::new()));
    }
}
