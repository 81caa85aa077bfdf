// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    LoadLeads,
    UpdateLead,
    CreateOpportunity,
}

impl BackendOp {
    pub const ALL: [Self; 3] = [Self::LoadLeads, Self::UpdateLead, Self::CreateOpportunity];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadLeads => "load_leads",
            Self::UpdateLead => "update_lead",
            Self::CreateOpportunity => "create_opportunity",
        }
    }
}

/// Decides whether a simulated round trip fails.
pub trait FaultInjector {
    fn should_fail(&mut self, op: BackendOp) -> bool;
}

/// Per-operation failure probabilities in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultRates {
    pub load: f64,
    pub update: f64,
    pub create: f64,
}

impl Default for FaultRates {
    fn default() -> Self {
        Self {
            load: 0.0,
            update: 0.1,
            create: 0.0,
        }
    }
}

impl FaultRates {
    pub const fn none() -> Self {
        Self {
            load: 0.0,
            update: 0.0,
            create: 0.0,
        }
    }

    pub fn rate(&self, op: BackendOp) -> f64 {
        let raw = match op {
            BackendOp::LoadLeads => self.load,
            BackendOp::UpdateLead => self.update,
            BackendOp::CreateOpportunity => self.create,
        };
        if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fails each operation with its configured probability.
#[derive(Debug, Clone)]
pub struct RandomFaults {
    rng: StdRng,
    rates: FaultRates,
}

impl RandomFaults {
    pub fn new(rates: FaultRates, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, rates }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&mut self, op: BackendOp) -> bool {
        chance(&mut self.rng, self.rates.rate(op))
    }
}

/// Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_fail(&mut self, _op: BackendOp) -> bool {
        false
    }
}

/// Always fails the listed operations and nothing else.
#[derive(Debug, Clone, Default)]
pub struct FailingOps(pub Vec<BackendOp>);

impl FailingOps {
    pub fn only(op: BackendOp) -> Self {
        Self(vec![op])
    }
}

impl FaultInjector for FailingOps {
    fn should_fail(&mut self, op: BackendOp) -> bool {
        self.0.contains(&op)
    }
}

fn chance(rng: &mut StdRng, rate: f64) -> bool {
    if rate <= 0.0 {
        return false;
    }
    rng.random_range(0.0..1.0) < rate
}
