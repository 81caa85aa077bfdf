// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    FilterPatch, Lead, LeadFilters, LeadId, LeadUpdate, Pagination, PreferenceStore,
    apply_filters, apply_pagination, load_saved_filters, save_filters,
};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load leads";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update lead. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadCommand {
    LoadStarted,
    LoadSucceeded(Vec<Lead>),
    LoadFailed(Option<String>),
    UpdateStarted,
    UpdateRejected(String),
    SelectLead(Option<Lead>),
    CloseDetailPanel,
    SetFilters(FilterPatch),
    SetPage(usize),
    UpdateLeadOptimistic { id: LeadId, updates: LeadUpdate },
    RollbackLeadUpdate { id: LeadId, original: Lead },
    RemoveLead(LeadId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadEvent {
    LoadingChanged(bool),
    ErrorSet(String),
    ErrorCleared,
    LeadsReplaced(usize),
    SelectionChanged(Option<LeadId>),
    FiltersChanged(LeadFilters),
    PageChanged(usize),
    LeadUpdated(LeadId),
    LeadRestored(LeadId),
    LeadRemoved(LeadId),
}

/// Owns the canonical lead list and everything derived from it.
///
/// `filtered_leads`, `displayed_leads` and the pagination totals are
/// recomputed by every command that touches their inputs. The detail panel is
/// open exactly when a lead is selected.
pub struct LeadStore {
    leads: Vec<Lead>,
    filtered_leads: Vec<Lead>,
    displayed_leads: Vec<Lead>,
    selected_lead: Option<Lead>,
    filters: LeadFilters,
    pagination: Pagination,
    is_loading: bool,
    error: Option<String>,
    preferences: Box<dyn PreferenceStore>,
}

impl LeadStore {
    pub fn new(preferences: Box<dyn PreferenceStore>) -> Self {
        let filters = load_saved_filters(preferences.as_ref());
        Self {
            leads: Vec::new(),
            filtered_leads: Vec::new(),
            displayed_leads: Vec::new(),
            selected_lead: None,
            filters,
            pagination: Pagination::default(),
            is_loading: false,
            error: None,
            preferences,
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn filtered_leads(&self) -> &[Lead] {
        &self.filtered_leads
    }

    pub fn displayed_leads(&self) -> &[Lead] {
        &self.displayed_leads
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        self.selected_lead.as_ref()
    }

    pub fn is_detail_panel_open(&self) -> bool {
        self.selected_lead.is_some()
    }

    pub fn filters(&self) -> &LeadFilters {
        &self.filters
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| &lead.id == id)
    }

    pub fn dispatch(&mut self, command: LeadCommand) -> Vec<LeadEvent> {
        match command {
            LeadCommand::LoadStarted => {
                self.is_loading = true;
                self.error = None;
                vec![LeadEvent::LoadingChanged(true), LeadEvent::ErrorCleared]
            }
            LeadCommand::LoadSucceeded(leads) => {
                self.is_loading = false;
                self.leads = leads;
                self.recompute();
                vec![
                    LeadEvent::LoadingChanged(false),
                    LeadEvent::LeadsReplaced(self.leads.len()),
                ]
            }
            LeadCommand::LoadFailed(message) => {
                self.is_loading = false;
                let message = message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| LOAD_FAILED_MESSAGE.to_owned());
                vec![LeadEvent::LoadingChanged(false), self.set_error(message)]
            }
            LeadCommand::UpdateStarted => {
                self.error = None;
                vec![LeadEvent::ErrorCleared]
            }
            LeadCommand::UpdateRejected(message) => vec![self.set_error(message)],
            LeadCommand::SelectLead(lead) => {
                self.selected_lead = lead;
                vec![self.selection_event()]
            }
            LeadCommand::CloseDetailPanel => {
                self.selected_lead = None;
                vec![self.selection_event()]
            }
            LeadCommand::SetFilters(patch) => self.set_filters(patch),
            LeadCommand::SetPage(page) => {
                self.pagination.current_page = page;
                self.repaginate();
                vec![LeadEvent::PageChanged(page)]
            }
            LeadCommand::UpdateLeadOptimistic { id, updates } => {
                self.update_lead_optimistic(id, &updates)
            }
            LeadCommand::RollbackLeadUpdate { id, original } => {
                self.rollback_lead_update(id, original)
            }
            LeadCommand::RemoveLead(id) => self.remove_lead(id),
        }
    }

    fn set_filters(&mut self, patch: FilterPatch) -> Vec<LeadEvent> {
        self.filters.merge(patch);
        self.pagination.current_page = 1;
        self.recompute();
        save_filters(self.preferences.as_ref(), &self.filters);
        tracing::debug!(
            search = %self.filters.search,
            status = self.filters.status.as_str(),
            sort_by = self.filters.sort_by.as_str(),
            sort_order = self.filters.sort_order.as_str(),
            matched = self.filtered_leads.len(),
            "filters applied"
        );
        vec![
            LeadEvent::FiltersChanged(self.filters.clone()),
            LeadEvent::PageChanged(1),
        ]
    }

    fn update_lead_optimistic(&mut self, id: LeadId, updates: &LeadUpdate) -> Vec<LeadEvent> {
        let Some(lead) = self.leads.iter_mut().find(|lead| lead.id == id) else {
            tracing::debug!(lead = %id, "optimistic update for unknown lead ignored");
            return Vec::new();
        };
        updates.apply_to(lead);
        if let Some(selected) = self.selected_lead.as_mut()
            && selected.id == id
        {
            updates.apply_to(selected);
        }
        self.recompute();
        vec![LeadEvent::LeadUpdated(id)]
    }

    fn rollback_lead_update(&mut self, id: LeadId, original: Lead) -> Vec<LeadEvent> {
        let Some(lead) = self.leads.iter_mut().find(|lead| lead.id == id) else {
            tracing::debug!(lead = %id, "rollback for unknown lead ignored");
            return Vec::new();
        };
        *lead = original.clone();
        if let Some(selected) = self.selected_lead.as_mut()
            && selected.id == id
        {
            *selected = original;
        }
        self.recompute();
        vec![LeadEvent::LeadRestored(id)]
    }

    fn remove_lead(&mut self, id: LeadId) -> Vec<LeadEvent> {
        self.leads.retain(|lead| lead.id != id);
        self.recompute();
        let mut events = vec![LeadEvent::LeadRemoved(id.clone())];
        if self
            .selected_lead
            .as_ref()
            .is_some_and(|selected| selected.id == id)
        {
            self.selected_lead = None;
            events.push(self.selection_event());
        }
        events
    }

    fn recompute(&mut self) {
        self.filtered_leads = apply_filters(&self.leads, &self.filters);
        self.repaginate();
    }

    fn repaginate(&mut self) {
        let (displayed, pagination) = apply_pagination(&self.filtered_leads, self.pagination);
        self.displayed_leads = displayed;
        self.pagination = pagination;
    }

    fn selection_event(&self) -> LeadEvent {
        LeadEvent::SelectionChanged(self.selected_lead.as_ref().map(|lead| lead.id.clone()))
    }

    fn set_error(&mut self, message: String) -> LeadEvent {
        self.error = Some(message.clone());
        LeadEvent::ErrorSet(message)
    }
}
