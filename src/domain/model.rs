use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 隊伍識別碼 (通常是三個字母的縮寫)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// 題目識別碼，取自題目清單
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    First,
    Second,
}

impl Round {
    pub const ALL: [Round; 2] = [Round::First, Round::Second];

    pub fn index(self) -> usize {
        match self {
            Round::First => 0,
            Round::Second => 1,
        }
    }

    pub fn other(self) -> Round {
        match self {
            Round::First => Round::Second,
            Round::Second => Round::First,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    accepted: [Option<SubjectId>; 2],
    rejected: [BTreeSet<SubjectId>; 2],
}

impl Team {
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            accepted: [None, None],
            rejected: [BTreeSet::new(), BTreeSet::new()],
        }
    }

    pub fn accepted(&self, round: Round) -> Option<&SubjectId> {
        self.accepted[round.index()].as_ref()
    }

    pub fn has_accepted(&self, round: Round) -> bool {
        self.accepted[round.index()].is_some()
    }

    pub fn rejected(&self, round: Round) -> &BTreeSet<SubjectId> {
        &self.rejected[round.index()]
    }

    /// 記錄接受的題目。每輪只能設定一次，重複設定代表呼叫端繞過了輪次控制。
    pub fn accept(&mut self, round: Round, subject: SubjectId) {
        let slot = &mut self.accepted[round.index()];
        assert!(
            slot.is_none(),
            "team {} already accepted {:?} in round {}",
            self.id,
            slot,
            round
        );
        *slot = Some(subject);
    }

    /// Returns `true` when the subject was not rejected before in this round.
    pub fn reject(&mut self, round: Round, subject: SubjectId) -> bool {
        self.rejected[round.index()].insert(subject)
    }

    pub fn coeff(&self, round: Round, max_refuse: usize) -> f64 {
        let refused = self.rejected(round).len();
        if refused <= max_refuse {
            2.0
        } else {
            2.0 - 0.5 * (refused - max_refuse) as f64
        }
    }

    pub fn free_refusals_left(&self, round: Round, max_refuse: usize) -> usize {
        max_refuse.saturating_sub(self.rejected(round).len())
    }
}

/// Pools per round are lettered `A` to `Z`.
pub const MAX_POOLS_PER_ROUND: usize = 26;

/// 分組 (label, round)，排序先依輪次再依字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pool {
    pub round: Round,
    pub label: char,
}

impl Pool {
    pub fn new(label: char, round: Round) -> Self {
        Self { round, label }
    }

    /// The `index`-th pool of a round: 0 -> A, 1 -> B, ...
    pub fn nth(index: usize, round: Round) -> Self {
        assert!(
            index < MAX_POOLS_PER_ROUND,
            "pool index {} has no letter label",
            index
        );
        let label = (b'A' + index as u8) as char;
        Self::new(label, round)
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.round)
    }
}

/// 外部呼叫端送進 rendezvous channel 的值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValue {
    Roll(u32),
    SubjectRequest,
    Decision(bool),
}

impl SubmissionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SubmissionValue::Roll(_) => ValueKind::Roll,
            SubmissionValue::SubjectRequest => ValueKind::SubjectRequest,
            SubmissionValue::Decision(_) => ValueKind::Decision,
        }
    }
}

impl fmt::Display for SubmissionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionValue::Roll(n) => write!(f, "roll {}", n),
            SubmissionValue::SubjectRequest => f.write_str("subject request"),
            SubmissionValue::Decision(true) => f.write_str("accept"),
            SubmissionValue::Decision(false) => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Roll,
    SubjectRequest,
    Decision,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Roll => f.write_str("dice roll"),
            ValueKind::SubjectRequest => f.write_str("subject request"),
            ValueKind::Decision => f.write_str("accept/reject decision"),
        }
    }
}

/// What the orchestrator answers when it releases a submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The submission was consumed.
    Processed,
    /// The submission was a subject request and this subject was drawn.
    Drawn(SubjectId),
    /// The submission was not expected and was thrown away.
    Discarded,
}

/// 五隊分組在全部選完題後的出場順序規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationPolicy {
    /// Pairs sharing a subject present first, in encounter order.
    #[default]
    DoublesFirst,
    /// Presentation order stays the draw order.
    DrawOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coeff_ignores_repeated_rejections() {
        let mut team = Team::new(TeamId::from("AAA"));
        assert!(team.reject(Round::First, SubjectId::from("P2")));
        assert!(!team.reject(Round::First, SubjectId::from("P2")));
        assert_eq!(team.rejected(Round::First).len(), 1);
        assert_eq!(team.coeff(Round::First, 1), 2.0);
    }

    #[test]
    fn test_coeff_degrades_past_max_refuse() {
        let mut team = Team::new(TeamId::from("AAA"));
        team.reject(Round::First, SubjectId::from("P2"));
        assert_eq!(team.coeff(Round::First, 1), 2.0);
        assert_eq!(team.free_refusals_left(Round::First, 1), 0);

        team.reject(Round::First, SubjectId::from("P5"));
        assert_eq!(team.coeff(Round::First, 1), 1.5);

        // 第二輪的拒絕獨立計算
        assert_eq!(team.coeff(Round::Second, 1), 2.0);
    }

    #[test]
    #[should_panic(expected = "already accepted")]
    fn test_second_accept_panics() {
        let mut team = Team::new(TeamId::from("AAA"));
        team.accept(Round::First, SubjectId::from("P1"));
        team.accept(Round::First, SubjectId::from("P2"));
    }

    #[test]
    fn test_pool_ordering_and_display() {
        let a1 = Pool::nth(0, Round::First);
        let b1 = Pool::nth(1, Round::First);
        let a2 = Pool::nth(0, Round::Second);
        assert!(a1 < b1);
        assert!(b1 < a2);
        assert_eq!(a1.to_string(), "A1");
        assert_eq!(b1.label, 'B');
        assert_eq!(Pool::nth(MAX_POOLS_PER_ROUND - 1, Round::First).label, 'Z');
    }

    #[test]
    #[should_panic(expected = "no letter label")]
    fn test_pool_past_z_panics() {
        Pool::nth(MAX_POOLS_PER_ROUND, Round::First);
    }
}
