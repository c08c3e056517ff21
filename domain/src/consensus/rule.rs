//! Rules deciding when an answer has enough group support

use serde::{Deserialize, Serialize};

/// Rule for deciding whether an answer is backed by the group
///
/// Used by the aggregator to decide when a basic answer earns its majority
/// boost. The default is a strict majority: `count > members / 2`.
///
/// # Example
///
/// ```
/// use tablepick_domain::consensus::ConsensusRule;
///
/// let rule = ConsensusRule::Majority;
/// assert!(rule.is_satisfied(3, 5));
/// assert!(!rule.is_satisfied(2, 4)); // an even split is not a majority
///
/// let rule: ConsensusRule = "60%".parse().unwrap();
/// assert!(rule.is_satisfied(3, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusRule {
    /// More than half of the members
    #[default]
    Majority,

    /// Every member
    Unanimous,

    /// At least n members
    AtLeast(usize),

    /// At least this percentage of members (0-100)
    Percentage(u8),
}

impl ConsensusRule {
    /// Check the rule for `supporters` out of `members`
    pub fn is_satisfied(&self, supporters: usize, members: usize) -> bool {
        if members == 0 {
            return false;
        }
        supporters >= self.min_supporters(members) && supporters > 0
    }

    /// Smallest supporter count that satisfies the rule for `members`
    pub fn min_supporters(&self, members: usize) -> usize {
        match self {
            ConsensusRule::Majority => members / 2 + 1,
            ConsensusRule::Unanimous => members,
            ConsensusRule::AtLeast(n) => *n,
            ConsensusRule::Percentage(p) => {
                (members as f64 * (f64::from(*p).min(100.0) / 100.0)).ceil() as usize
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            ConsensusRule::Majority => "majority (more than half)".to_string(),
            ConsensusRule::Unanimous => "unanimous (every member)".to_string(),
            ConsensusRule::AtLeast(n) => format!("at least {} members", n),
            ConsensusRule::Percentage(p) => format!("at least {}% of members", p),
        }
    }
}

impl std::fmt::Display for ConsensusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(ConsensusRule::Majority),
            "unanimous" => Ok(ConsensusRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                Ok(ConsensusRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str.parse().map_err(|_| "Invalid percentage")?;
                if p > 100 {
                    return Err(format!("Percentage out of range: {}", p));
                }
                Ok(ConsensusRule::Percentage(p))
            }
            _ => Err(format!(
                "Unknown consensus rule: {}. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_matches_strict_half() {
        let rule = ConsensusRule::Majority;
        for members in 1..=12usize {
            for count in 0..=members {
                let expected = count as f64 > members as f64 / 2.0;
                assert_eq!(
                    rule.is_satisfied(count, members),
                    expected,
                    "count={} members={}",
                    count,
                    members
                );
            }
        }
    }

    #[test]
    fn test_unanimous() {
        assert!(ConsensusRule::Unanimous.is_satisfied(4, 4));
        assert!(!ConsensusRule::Unanimous.is_satisfied(3, 4));
    }

    #[test]
    fn test_zero_members_never_satisfied() {
        assert!(!ConsensusRule::Majority.is_satisfied(0, 0));
        assert!(!ConsensusRule::AtLeast(0).is_satisfied(0, 0));
    }

    #[test]
    fn test_zero_supporters_never_satisfied() {
        assert!(!ConsensusRule::AtLeast(0).is_satisfied(0, 3));
        assert!(!ConsensusRule::Percentage(0).is_satisfied(0, 3));
    }

    #[test]
    fn test_percentage_rounds_up() {
        let rule = ConsensusRule::Percentage(50);
        assert_eq!(rule.min_supporters(5), 3);
        assert!(rule.is_satisfied(2, 4));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("majority".parse::<ConsensusRule>().unwrap(), ConsensusRule::Majority);
        assert_eq!("UNANIMOUS".parse::<ConsensusRule>().unwrap(), ConsensusRule::Unanimous);
        assert_eq!("atleast:3".parse::<ConsensusRule>().unwrap(), ConsensusRule::AtLeast(3));
        assert_eq!("75%".parse::<ConsensusRule>().unwrap(), ConsensusRule::Percentage(75));
        assert!("150%".parse::<ConsensusRule>().is_err());
        assert!("plurality".parse::<ConsensusRule>().is_err());
    }
}
