// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use leadboard_app::{
    CREATE_FAILED_MESSAGE, LOAD_FAILED_MESSAGE, Lead, LeadId, LeadUpdate, Opportunity,
    OpportunityId, UPDATE_FAILED_MESSAGE,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use time::OffsetDateTime;

use crate::{BackendOp, FaultInjector};

const BUNDLED_LEADS: &str = include_str!("../data/leads.json");

/// The remote side of the console. Each call is one round trip.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn fetch_leads(&mut self) -> Result<Vec<Lead>>;

    /// Resolves with the accepted update.
    async fn confirm_lead_update(&mut self, id: &LeadId, updates: &LeadUpdate)
    -> Result<LeadUpdate>;

    async fn create_opportunity(&mut self, lead: &Lead) -> Result<Opportunity>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub load: Duration,
    pub update: Duration,
    pub create: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            load: Duration::from_millis(800),
            update: Duration::from_millis(500),
            create: Duration::from_millis(600),
        }
    }
}

impl Latency {
    pub fn for_op(&self, op: BackendOp) -> Duration {
        match op {
            BackendOp::LoadLeads => self.load,
            BackendOp::UpdateLead => self.update,
            BackendOp::CreateOpportunity => self.create,
        }
    }
}

/// In-process stand-in for the lead service: fixed dataset, timed delays and
/// injected failures.
pub struct SimulatedBackend {
    dataset: Vec<Lead>,
    latency: Latency,
    faults: Box<dyn FaultInjector>,
    opportunity_seq: u64,
}

impl SimulatedBackend {
    pub fn new(dataset: Vec<Lead>, latency: Latency, faults: Box<dyn FaultInjector>) -> Self {
        Self {
            dataset,
            latency,
            faults,
            opportunity_seq: 0,
        }
    }

    pub fn dataset(&self) -> &[Lead] {
        &self.dataset
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    pub fn set_dataset(&mut self, dataset: Vec<Lead>) {
        self.dataset = dataset;
    }

    async fn round_trip(&mut self, op: BackendOp) -> bool {
        let delay = self.latency.for_op(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failed = self.faults.should_fail(op);
        if failed {
            tracing::debug!(op = op.as_str(), "simulated failure injected");
        }
        failed
    }

    fn next_opportunity_id(&mut self, now: OffsetDateTime) -> OpportunityId {
        self.opportunity_seq += 1;
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        OpportunityId::new(format!("opp-{millis}-{}", self.opportunity_seq))
    }
}

impl Backend for SimulatedBackend {
    async fn fetch_leads(&mut self) -> Result<Vec<Lead>> {
        if self.round_trip(BackendOp::LoadLeads).await {
            bail!(LOAD_FAILED_MESSAGE);
        }
        Ok(self.dataset.clone())
    }

    async fn confirm_lead_update(
        &mut self,
        id: &LeadId,
        updates: &LeadUpdate,
    ) -> Result<LeadUpdate> {
        if self.round_trip(BackendOp::UpdateLead).await {
            bail!(UPDATE_FAILED_MESSAGE);
        }
        tracing::debug!(lead = %id, "lead update accepted");
        Ok(updates.clone())
    }

    async fn create_opportunity(&mut self, lead: &Lead) -> Result<Opportunity> {
        if self.round_trip(BackendOp::CreateOpportunity).await {
            bail!(CREATE_FAILED_MESSAGE);
        }
        let now = OffsetDateTime::now_utc();
        let id = self.next_opportunity_id(now);
        Ok(Opportunity::from_lead(lead, id, now))
    }
}

/// The sample dataset compiled into the binary.
pub fn bundled_leads() -> Result<Vec<Lead>> {
    parse_leads(BUNDLED_LEADS).context("parse bundled lead dataset")
}

pub fn load_leads_file(path: &Path) -> Result<Vec<Lead>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read lead dataset {}", path.display()))?;
    parse_leads(&raw).with_context(|| format!("parse lead dataset {}", path.display()))
}

fn parse_leads(raw: &str) -> Result<Vec<Lead>> {
    let leads: Vec<Lead> = serde_json::from_str(raw)?;
    let mut seen = BTreeSet::new();
    for lead in &leads {
        if !seen.insert(lead.id.as_str()) {
            bail!("duplicate lead id {}", lead.id);
        }
    }
    Ok(leads)
}
