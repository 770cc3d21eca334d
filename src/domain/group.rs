use crate::domain::member::{Member, MemberId};
use crate::domain::money::Sats;
use crate::domain::schedule::PayoutSchedule;
use crate::error::{Result, RoscaError};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

/// Group formation record: who participates, what each round costs, and
/// who receives the pool in which round. Immutable for the lifetime of
/// the cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub contribution_sats: Sats,
    pub members: Vec<Member>,
    pub payout_order: Vec<MemberId>,
}

impl GroupConfig {
    /// Loads and validates a group from a JSON source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: GroupConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// A built-in demo group: four friends at 25 000 sats per round,
    /// payouts in join order.
    pub fn demo() -> Self {
        Self {
            name: "Lightning Rosca".to_string(),
            contribution_sats: Sats::new(25_000),
            members: vec![
                Member::new(1u32, "Oyin", "oyin112@gmail.com", "02a1..."),
                Member::new(2u32, "Jika", "jika101@gmail.com", "03b2..."),
                Member::new(3u32, "Victor", "victor123@gmail.com", "04c3..."),
                Member::new(4u32, "Abdul", "abdul122@gmail.com", "05d4..."),
            ],
            payout_order: vec![MemberId(1), MemberId(2), MemberId(3), MemberId(4)],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.members.is_empty() {
            return Err(RoscaError::Validation(
                "a group needs at least one member".to_string(),
            ));
        }
        if self.contribution_sats == Sats::ZERO {
            return Err(RoscaError::Validation(
                "the contribution amount must be positive".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for member in &self.members {
            if !seen.insert(member.id) {
                return Err(RoscaError::Validation(format!(
                    "duplicate member id {}",
                    member.id
                )));
            }
        }
        self.schedule()?;
        Ok(())
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|member| member.id).collect()
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// One round per member.
    pub fn total_rounds(&self) -> u32 {
        self.members.len() as u32
    }

    /// The pooled total a recipient receives when every contributor pays.
    pub fn pool_total(&self) -> Sats {
        self.contribution_sats * self.members.len() as u64
    }

    /// The validated recipient-per-round table.
    pub fn schedule(&self) -> Result<PayoutSchedule> {
        PayoutSchedule::new(&self.member_ids(), self.payout_order.clone())
    }
}
