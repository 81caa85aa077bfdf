// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use leadboard_app::{Lead, LeadId, LeadStatus};
use std::path::PathBuf;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANY_STEMS: [&str; 14] = [
    "Northwind",
    "Bluefin",
    "Cedar",
    "Summit",
    "Lakeside",
    "Harbor",
    "Pioneer",
    "Granite",
    "Evergreen",
    "Copperline",
    "Brightpath",
    "Ironwood",
    "Silverleaf",
    "Redstone",
];
const COMPANY_SUFFIXES: [&str; 6] = ["Labs", "Systems", "Group", "Logistics", "Health", "Media"];

const SOURCES: [&str; 6] = [
    "website",
    "referral",
    "trade show",
    "cold call",
    "linkedin",
    "webinar",
];

const STATUSES: [LeadStatus; 4] = LeadStatus::ALL;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible leads.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    /// Lead number `index`; ids are zero-padded so id order is index order.
    pub fn lead(&mut self, index: usize) -> Lead {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let stem = self.pick(&COMPANY_STEMS);
        let suffix = self.pick(&COMPANY_SUFFIXES);
        Lead {
            id: lead_id(index),
            name: format!("{first} {last}"),
            company: format!("{stem} {suffix}"),
            email: format!(
                "{}.{}@{}.example",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                stem.to_ascii_lowercase()
            ),
            source: self.pick(&SOURCES).to_owned(),
            score: self.rng.int_n(101) as u32,
            status: STATUSES[self.rng.int_n(STATUSES.len())],
        }
    }

    /// `count` leads numbered from 1.
    pub fn leads(&mut self, count: usize) -> Vec<Lead> {
        (1..=count).map(|index| self.lead(index)).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn lead_id(index: usize) -> LeadId {
    LeadId::new(format!("lead-{index:04}"))
}

/// `count` leads sharing one score, so score ordering falls back to id order.
pub fn uniform_leads(count: usize) -> Vec<Lead> {
    let mut faker = LeadFaker::new(count as u64);
    (1..=count)
        .map(|index| Lead {
            score: 50,
            ..faker.lead(index)
        })
        .collect()
}

/// The three-person roster used by the search and status scenarios.
pub fn roster() -> Vec<Lead> {
    let person = |id: &str, name: &str, company: &str, score: u32, status: LeadStatus| Lead {
        id: LeadId::from(id),
        name: name.to_owned(),
        company: company.to_owned(),
        email: format!("{}@{}.com", id, company.to_ascii_lowercase()),
        source: "website".to_owned(),
        score,
        status,
    };
    vec![
        person("1", "John Doe", "Acme", 85, LeadStatus::New),
        person("2", "Jane Smith", "Globex", 72, LeadStatus::Contacted),
        person("3", "Bob Johnson", "Initech", 91, LeadStatus::Qualified),
    ]
}

pub fn temp_prefs_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("prefs.db");
    Ok((dir, path))
}
