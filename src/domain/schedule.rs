use crate::domain::member::MemberId;
use crate::error::{Result, RoscaError};

/// The fixed recipient-per-round assignment, established at group
/// formation and immutable thereafter.
///
/// A valid schedule names each member exactly once, which also makes the
/// number of rounds equal the number of members.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutSchedule {
    order: Vec<MemberId>,
}

impl PayoutSchedule {
    pub fn new(members: &[MemberId], order: Vec<MemberId>) -> Result<Self> {
        if order.len() != members.len() {
            return Err(RoscaError::Validation(format!(
                "payout order names {} recipients for {} members",
                order.len(),
                members.len()
            )));
        }
        for member in members {
            let count = order.iter().filter(|entry| *entry == member).count();
            if count != 1 {
                return Err(RoscaError::Validation(format!(
                    "member {member} appears {count} times in the payout order, expected exactly once"
                )));
            }
        }
        Ok(Self { order })
    }

    pub fn total_rounds(&self) -> u32 {
        self.order.len() as u32
    }

    pub fn order(&self) -> &[MemberId] {
        &self.order
    }

    /// The designated recipient of a round.
    pub fn recipient_of(&self, round: u32) -> Result<MemberId> {
        self.order.get(round as usize).copied().ok_or_else(|| {
            RoscaError::OutOfRange(format!("round {round} of {}", self.total_rounds()))
        })
    }
}

/// Position in the round cycle.
///
/// Navigation saturates at both ends and never checks round completeness:
/// any round may be inspected at any time regardless of payment state.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundCursor {
    current: u32,
    last: u32,
}

impl RoundCursor {
    pub fn new(total_rounds: u32) -> Result<Self> {
        if total_rounds == 0 {
            return Err(RoscaError::Validation(
                "a cycle needs at least one round".to_string(),
            ));
        }
        Ok(Self {
            current: 0,
            last: total_rounds - 1,
        })
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn advance(&mut self) -> u32 {
        if self.current < self.last {
            self.current += 1;
        }
        self.current
    }

    pub fn retreat(&mut self) -> u32 {
        if self.current > 0 {
            self.current -= 1;
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_ids() -> Vec<MemberId> {
        (1..=4).map(MemberId).collect()
    }

    #[test]
    fn test_valid_schedule() {
        let schedule =
            PayoutSchedule::new(&member_ids(), vec![MemberId(3), MemberId(1), MemberId(4), MemberId(2)])
                .unwrap();
        assert_eq!(schedule.total_rounds(), 4);
        assert_eq!(schedule.recipient_of(0).unwrap(), MemberId(3));
        assert_eq!(schedule.recipient_of(3).unwrap(), MemberId(2));
    }

    #[test]
    fn test_schedule_length_must_match_members() {
        let result = PayoutSchedule::new(&member_ids(), vec![MemberId(1), MemberId(2)]);
        assert!(matches!(result, Err(RoscaError::Validation(_))));
    }

    #[test]
    fn test_schedule_rejects_repeated_recipient() {
        let result = PayoutSchedule::new(
            &member_ids(),
            vec![MemberId(1), MemberId(1), MemberId(3), MemberId(4)],
        );
        assert!(matches!(result, Err(RoscaError::Validation(_))));
    }

    #[test]
    fn test_schedule_rejects_unknown_recipient() {
        // Member 2 is missing and 9 is not in the group.
        let result = PayoutSchedule::new(
            &member_ids(),
            vec![MemberId(1), MemberId(9), MemberId(3), MemberId(4)],
        );
        assert!(matches!(result, Err(RoscaError::Validation(_))));
    }

    #[test]
    fn test_recipient_lookup_out_of_range() {
        let schedule = PayoutSchedule::new(&member_ids(), member_ids()).unwrap();
        assert!(matches!(
            schedule.recipient_of(4),
            Err(RoscaError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_cursor_saturates_at_both_ends() {
        let mut cursor = RoundCursor::new(4).unwrap();
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.retreat(), 0);

        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 3);
        assert_eq!(cursor.advance(), 3);

        assert_eq!(cursor.retreat(), 2);
    }

    #[test]
    fn test_cursor_needs_a_round() {
        assert!(matches!(
            RoundCursor::new(0),
            Err(RoscaError::Validation(_))
        ));
    }
}
