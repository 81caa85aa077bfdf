// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Opportunity, OpportunityId, OpportunityUpdate};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create opportunity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityCommand {
    CreateStarted,
    CreateSucceeded(Opportunity),
    CreateFailed(Option<String>),
    UpdateOpportunity {
        id: OpportunityId,
        updates: OpportunityUpdate,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityEvent {
    LoadingChanged(bool),
    ErrorSet(String),
    ErrorCleared,
    Created(OpportunityId),
    Updated(OpportunityId),
}

/// Append-only list of opportunities created during the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpportunityStore {
    opportunities: Vec<Opportunity>,
    is_loading: bool,
    error: Option<String>,
}

impl OpportunityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn opportunity(&self, id: &OpportunityId) -> Option<&Opportunity> {
        self.opportunities
            .iter()
            .find(|opportunity| &opportunity.id == id)
    }

    pub fn dispatch(&mut self, command: OpportunityCommand) -> Vec<OpportunityEvent> {
        match command {
            OpportunityCommand::CreateStarted => {
                self.is_loading = true;
                self.error = None;
                vec![
                    OpportunityEvent::LoadingChanged(true),
                    OpportunityEvent::ErrorCleared,
                ]
            }
            OpportunityCommand::CreateSucceeded(opportunity) => {
                self.is_loading = false;
                let id = opportunity.id.clone();
                self.opportunities.push(opportunity);
                vec![
                    OpportunityEvent::LoadingChanged(false),
                    OpportunityEvent::Created(id),
                ]
            }
            OpportunityCommand::CreateFailed(message) => {
                self.is_loading = false;
                let message = message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| CREATE_FAILED_MESSAGE.to_owned());
                self.error = Some(message.clone());
                vec![
                    OpportunityEvent::LoadingChanged(false),
                    OpportunityEvent::ErrorSet(message),
                ]
            }
            OpportunityCommand::UpdateOpportunity { id, updates } => {
                match self
                    .opportunities
                    .iter_mut()
                    .find(|opportunity| opportunity.id == id)
                {
                    Some(opportunity) => {
                        updates.apply_to(opportunity);
                        vec![OpportunityEvent::Updated(id)]
                    }
                    None => Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CREATE_FAILED_MESSAGE, OpportunityCommand, OpportunityEvent, OpportunityStore};
    use crate::{
        Lead, LeadId, LeadStatus, Opportunity, OpportunityId, OpportunityStage, OpportunityUpdate,
    };
    use time::macros::datetime;

    fn opportunity(id: &str) -> Opportunity {
        let lead = Lead {
            id: LeadId::from("9"),
            name: "Grace Hopper".to_owned(),
            company: "Navy".to_owned(),
            email: "grace@navy.example".to_owned(),
            source: "event".to_owned(),
            score: 99,
            status: LeadStatus::Qualified,
        };
        Opportunity::from_lead(&lead, OpportunityId::from(id), datetime!(2026-01-05 9:30 UTC))
    }

    #[test]
    fn create_lifecycle_appends() {
        let mut store = OpportunityStore::new();
        store.dispatch(OpportunityCommand::CreateStarted);
        assert!(store.is_loading());

        let events = store.dispatch(OpportunityCommand::CreateSucceeded(opportunity("opp-1")));
        assert!(!store.is_loading());
        assert_eq!(store.opportunities().len(), 1);
        assert_eq!(
            events,
            vec![
                OpportunityEvent::LoadingChanged(false),
                OpportunityEvent::Created(OpportunityId::from("opp-1")),
            ]
        );
    }

    #[test]
    fn create_failure_keeps_list_and_records_error() {
        let mut store = OpportunityStore::new();
        store.dispatch(OpportunityCommand::CreateSucceeded(opportunity("opp-1")));
        store.dispatch(OpportunityCommand::CreateStarted);
        store.dispatch(OpportunityCommand::CreateFailed(Some("backend down".to_owned())));
        assert_eq!(store.error(), Some("backend down"));
        assert_eq!(store.opportunities().len(), 1);

        store.dispatch(OpportunityCommand::CreateFailed(None));
        assert_eq!(store.error(), Some(CREATE_FAILED_MESSAGE));

        store.dispatch(OpportunityCommand::CreateStarted);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn update_merges_stage_and_amount() {
        let mut store = OpportunityStore::new();
        store.dispatch(OpportunityCommand::CreateSucceeded(opportunity("opp-1")));

        store.dispatch(OpportunityCommand::UpdateOpportunity {
            id: OpportunityId::from("opp-1"),
            updates: OpportunityUpdate {
                stage: Some(OpportunityStage::Proposal),
                amount_cents: Some(1_250_000),
            },
        });
        let updated = store
            .opportunity(&OpportunityId::from("opp-1"))
            .expect("opportunity exists");
        assert_eq!(updated.stage, OpportunityStage::Proposal);
        assert_eq!(updated.amount_cents, Some(1_250_000));
        assert_eq!(updated.account_name, "Navy");
    }

    #[test]
    fn update_for_missing_id_is_noop() {
        let mut store = OpportunityStore::new();
        store.dispatch(OpportunityCommand::CreateSucceeded(opportunity("opp-1")));
        let before = store.clone();

        let events = store.dispatch(OpportunityCommand::UpdateOpportunity {
            id: OpportunityId::from("opp-404"),
            updates: OpportunityUpdate {
                stage: Some(OpportunityStage::ClosedLost),
                amount_cents: None,
            },
        });
        assert!(events.is_empty());
        assert_eq!(store, before);
    }
}
