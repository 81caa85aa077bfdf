// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Unqualified,
}

impl LeadStatus {
    pub const ALL: [Self; 4] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Unqualified,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Unqualified => "unqualified",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "unqualified" => Some(Self::Unqualified),
            _ => None,
        }
    }

    /// Unqualified leads never become opportunities.
    pub const fn is_convertible(self) -> bool {
        !matches!(self, Self::Unqualified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prospecting => "prospecting",
            Self::Qualification => "qualification",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prospecting" => Some(Self::Prospecting),
            "qualification" => Some(Self::Qualification),
            "proposal" => Some(Self::Proposal),
            "negotiation" => Some(Self::Negotiation),
            "closed-won" => Some(Self::ClosedWon),
            "closed-lost" => Some(Self::ClosedLost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Score,
    Name,
    Company,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Name => "name",
            Self::Company => "company",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "score" => Some(Self::Score),
            "name" => Some(Self::Name),
            "company" => Some(Self::Company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    All,
    Only(LeadStatus),
}

impl StatusFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(Self::All);
        }
        LeadStatus::parse(value).map(Self::Only)
    }

    pub fn matches(self, status: LeadStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown status filter {value:?}"))
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        value.as_str().to_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Hot,
    Warm,
    Lukewarm,
    Cold,
}

impl ScoreBand {
    pub const fn for_score(score: u32) -> Self {
        if score >= 90 {
            Self::Hot
        } else if score >= 80 {
            Self::Warm
        } else if score >= 70 {
            Self::Lukewarm
        } else {
            Self::Cold
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Lukewarm => "lukewarm",
            Self::Cold => "cold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: String,
    pub score: u32,
    pub status: LeadStatus,
}

/// Partial update for the editable lead fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            status: None,
        }
    }

    pub fn status(value: LeadStatus) -> Self {
        Self {
            email: None,
            status: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.status.is_none()
    }

    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(email) = &self.email {
            lead.email.clone_from(email);
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    pub name: String,
    pub stage: OpportunityStage,
    pub amount_cents: Option<i64>,
    pub account_name: String,
    pub created_from_lead: LeadId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Opportunity {
    pub fn from_lead(lead: &Lead, id: OpportunityId, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            name: format!("{} - {}", lead.company, lead.name),
            stage: OpportunityStage::Prospecting,
            amount_cents: None,
            account_name: lead.company.clone(),
            created_from_lead: lead.id.clone(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpportunityUpdate {
    pub stage: Option<OpportunityStage>,
    pub amount_cents: Option<i64>,
}

impl OpportunityUpdate {
    pub fn apply_to(&self, opportunity: &mut Opportunity) {
        if let Some(stage) = self.stage {
            opportunity.stage = stage;
        }
        if let Some(amount) = self.amount_cents {
            opportunity.amount_cents = Some(amount);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilters {
    pub search: String,
    pub status: StatusFilter,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl Default for LeadFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort_by: SortKey::Score,
            sort_order: SortOrder::Desc,
        }
    }
}

impl LeadFilters {
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }

    /// Re-selecting the active column while descending flips to ascending;
    /// anything else sorts descending.
    pub fn toggle_sort(&self, key: SortKey) -> FilterPatch {
        let sort_order = if self.sort_by == key && self.sort_order == SortOrder::Desc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        FilterPatch {
            sort_by: Some(key),
            sort_order: Some(sort_order),
            ..FilterPatch::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

impl FilterPatch {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn status(value: StatusFilter) -> Self {
        Self {
            status: Some(value),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            total_items: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FilterPatch, Lead, LeadFilters, LeadStatus, LeadUpdate, Opportunity, OpportunityStage,
        ScoreBand, SortKey, SortOrder, StatusFilter,
    };
    use crate::{LeadId, OpportunityId};
    use time::macros::datetime;

    fn lead() -> Lead {
        Lead {
            id: LeadId::from("7"),
            name: "Ada Byrne".to_owned(),
            company: "Northwind".to_owned(),
            email: "ada@northwind.example".to_owned(),
            source: "referral".to_owned(),
            score: 91,
            status: LeadStatus::Qualified,
        }
    }

    #[test]
    fn lead_decodes_from_bundled_shape() {
        let raw = r#"{"id":"1","name":"John Doe","company":"Acme","email":"john@acme.com","source":"web","score":88,"status":"contacted"}"#;
        let decoded: Lead = serde_json::from_str(raw).expect("decode lead");
        assert_eq!(decoded.status, LeadStatus::Contacted);
        assert_eq!(decoded.score, 88);
    }

    #[test]
    fn status_filter_round_trips_through_strings() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("new"),
            Some(StatusFilter::Only(LeadStatus::New))
        );
        assert_eq!(StatusFilter::parse("lost"), None);
        assert_eq!(StatusFilter::Only(LeadStatus::Qualified).as_str(), "qualified");
    }

    #[test]
    fn filters_serialize_with_camel_case_keys() {
        let encoded = serde_json::to_string(&LeadFilters::default()).expect("encode filters");
        assert_eq!(
            encoded,
            r#"{"search":"","status":"all","sortBy":"score","sortOrder":"desc"}"#
        );
    }

    #[test]
    fn partial_patch_merges_over_existing_filters() {
        let patch: FilterPatch = serde_json::from_str(r#"{"search":"acme"}"#).expect("decode");
        let mut filters = LeadFilters::default();
        filters.merge(patch);
        assert_eq!(filters.search, "acme");
        assert_eq!(filters.sort_by, SortKey::Score);
        assert_eq!(filters.sort_order, SortOrder::Desc);
    }

    #[test]
    fn toggle_sort_flips_only_active_descending_column() {
        let filters = LeadFilters::default();
        let same = filters.toggle_sort(SortKey::Score);
        assert_eq!(same.sort_order, Some(SortOrder::Asc));

        let other = filters.toggle_sort(SortKey::Name);
        assert_eq!(other.sort_by, Some(SortKey::Name));
        assert_eq!(other.sort_order, Some(SortOrder::Desc));
    }

    #[test]
    fn lead_update_touches_only_present_fields() {
        let mut target = lead();
        LeadUpdate::status(LeadStatus::Contacted).apply_to(&mut target);
        assert_eq!(target.status, LeadStatus::Contacted);
        assert_eq!(target.email, "ada@northwind.example");
    }

    #[test]
    fn opportunity_from_lead_derives_name_and_account() {
        let created_at = datetime!(2026-03-01 12:00 UTC);
        let opportunity =
            Opportunity::from_lead(&lead(), OpportunityId::from("opp-1"), created_at);
        assert_eq!(opportunity.name, "Northwind - Ada Byrne");
        assert_eq!(opportunity.account_name, "Northwind");
        assert_eq!(opportunity.stage, OpportunityStage::Prospecting);
        assert_eq!(opportunity.created_from_lead.as_str(), "7");
        assert_eq!(opportunity.amount_cents, None);
    }

    #[test]
    fn stage_strings_use_kebab_case() {
        assert_eq!(OpportunityStage::ClosedWon.as_str(), "closed-won");
        assert_eq!(
            OpportunityStage::parse("closed-lost"),
            Some(OpportunityStage::ClosedLost)
        );
        let encoded = serde_json::to_string(&OpportunityStage::ClosedWon).expect("encode");
        assert_eq!(encoded, "\"closed-won\"");
    }

    #[test]
    fn score_bands() {
        assert_eq!(ScoreBand::for_score(95), ScoreBand::Hot);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Warm);
        assert_eq!(ScoreBand::for_score(70), ScoreBand::Lukewarm);
        assert_eq!(ScoreBand::for_score(12).label(), "cold");
    }
}
