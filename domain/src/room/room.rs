//! Room state machine
//!
//! ```text
//! collecting ──► recommending ──► voting ──► completed
//!      │               │            ▲  │         │ (NoResult only)
//!      │               │            │  └─────────┘ RetryVoting
//!      └───────────────┴────────────┴──► abandoned
//! ```

use super::entities::{Decision, DecisionSource, MemberId, RoomCode, RoomPhase, RoomSummary, RoomView};
use super::event::{RoomEffect, RoomEvent, RoomRejection};
use super::tally::Tally;
use crate::consensus::{ConsensusAggregator, MergedAnswers};
use crate::questionnaire::AnswerSet;
use crate::ranking::{Shortlist, seeded_shuffle};
use crate::restaurant::RestaurantId;
use std::collections::{BTreeMap, BTreeSet};

/// One room's full state
///
/// [`Room::apply`] is the only mutator. It is synchronous and free of side
/// effects: whatever must happen outside (ranking, publishing) comes back as
/// [`RoomEffect`]s. Counts used for completion are recomputed from the member
/// list and vote records on every check.
///
/// # Example
///
/// ```
/// use tablepick_domain::ranking::Shortlist;
/// use tablepick_domain::room::{MemberId, Room, RoomCode, RoomEvent, RoomPhase};
///
/// let mut room = Room::new(RoomCode::new("ABCDEF").unwrap(), 0);
/// let alice = MemberId::new("alice").unwrap();
///
/// room.apply(&RoomEvent::MemberListChanged { members: vec![alice] }, 1).unwrap();
/// room.apply(&RoomEvent::RecommendationsRequested, 2).unwrap();
/// assert_eq!(room.phase(), RoomPhase::Recommending);
///
/// room.apply(&RoomEvent::ShortlistReady { shortlist: Shortlist::default() }, 3).unwrap();
/// assert_eq!(room.phase(), RoomPhase::Voting);
/// ```
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    phase: RoomPhase,
    members: Vec<MemberId>,
    /// First-submission order
    answers: Vec<(MemberId, AnswerSet)>,
    merged: Option<MergedAnswers>,
    shortlist: Option<Shortlist>,
    votes: BTreeMap<MemberId, RestaurantId>,
    likes: BTreeMap<MemberId, BTreeSet<RestaurantId>>,
    decision: Option<Decision>,
    aggregator: ConsensusAggregator,
    created_at_ms: u64,
    voting_opened_at_ms: Option<u64>,
    completed_at_ms: Option<u64>,
    /// Tally and counts frozen at completion
    closing: Option<Closing>,
}

#[derive(Debug, Clone, PartialEq)]
struct Closing {
    tally: Tally,
    voted: usize,
    total: usize,
}

impl Room {
    pub fn new(code: RoomCode, created_at_ms: u64) -> Self {
        Self::with_aggregator(code, ConsensusAggregator::default(), created_at_ms)
    }

    pub fn with_aggregator(code: RoomCode, aggregator: ConsensusAggregator, created_at_ms: u64) -> Self {
        Self {
            code,
            phase: RoomPhase::Collecting,
            members: Vec::new(),
            answers: Vec::new(),
            merged: None,
            shortlist: None,
            votes: BTreeMap::new(),
            likes: BTreeMap::new(),
            decision: None,
            aggregator,
            created_at_ms,
            voting_opened_at_ms: None,
            completed_at_ms: None,
            closing: None,
        }
    }

    /// Build a room by applying `events` in order, ignoring rejections
    pub fn replay<'a>(
        code: RoomCode,
        created_at_ms: u64,
        events: impl IntoIterator<Item = (&'a RoomEvent, u64)>,
    ) -> Self {
        let mut room = Self::new(code, created_at_ms);
        for (event, at_ms) in events {
            let _ = room.apply(event, at_ms);
        }
        room
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn merged(&self) -> Option<&MergedAnswers> {
        self.merged.as_ref()
    }

    pub fn shortlist(&self) -> Option<&Shortlist> {
        self.shortlist.as_ref()
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn voting_opened_at_ms(&self) -> Option<u64> {
        self.voting_opened_at_ms
    }

    /// No further event can change the room: abandoned, or completed with a winner
    pub fn is_settled(&self) -> bool {
        match self.phase {
            RoomPhase::Abandoned => true,
            RoomPhase::Completed => !self.decision.as_ref().is_some_and(Decision::is_no_result),
            _ => false,
        }
    }

    /// Apply one event
    ///
    /// A rejected event leaves the room unchanged. Duplicate or stale events
    /// that carry no new information succeed with no effects.
    pub fn apply(&mut self, event: &RoomEvent, at_ms: u64) -> Result<Vec<RoomEffect>, RoomRejection> {
        if self.phase == RoomPhase::Abandoned {
            return Err(RoomRejection::Abandoned);
        }

        match event {
            RoomEvent::MemberListChanged { members } => self.on_members(members, at_ms),
            RoomEvent::AnswersSubmitted { member, answers } => self.on_answers(member, answers),
            RoomEvent::VoteChanged { member, restaurant } => {
                self.on_vote(member, restaurant.as_ref(), at_ms)
            }
            RoomEvent::Swiped {
                member,
                restaurant,
                liked,
            } => self.on_swipe(member, restaurant, *liked),
            RoomEvent::RecommendationsRequested => self.on_recommendations_requested(),
            RoomEvent::ShortlistReady { shortlist } => self.on_shortlist(shortlist, at_ms),
            RoomEvent::FinalizeRequested { choice } => self.on_finalize(choice.as_ref(), at_ms),
            RoomEvent::RetryVoting => self.on_retry(),
            RoomEvent::Abandon => self.on_abandon(),
        }
    }

    // ==================== Handlers ====================

    fn on_members(
        &mut self,
        members: &[MemberId],
        at_ms: u64,
    ) -> Result<Vec<RoomEffect>, RoomRejection> {
        if self.phase == RoomPhase::Completed {
            return Err(RoomRejection::Finalized);
        }
        let mut unique: Vec<MemberId> = Vec::with_capacity(members.len());
        for m in members {
            if !unique.contains(m) {
                unique.push(m.clone());
            }
        }
        if unique == self.members {
            return Ok(Vec::new());
        }
        self.members = unique;

        Ok(match self.phase {
            RoomPhase::Collecting => self.request_if_all_answered(),
            RoomPhase::Voting => {
                let mut effects = vec![self.tally_effect()];
                effects.extend(self.complete_if_all_voted(at_ms));
                effects
            }
            _ => Vec::new(),
        })
    }

    fn on_answers(&mut self, member: &MemberId, answers: &AnswerSet) -> Result<Vec<RoomEffect>, RoomRejection> {
        match self.phase {
            RoomPhase::Collecting => {}
            RoomPhase::Completed => return Err(RoomRejection::Finalized),
            phase => return Err(RoomRejection::AnswersClosed(phase)),
        }

        match self.answers.iter_mut().find(|(m, _)| m == member) {
            Some((_, existing)) if existing == answers => return Ok(Vec::new()),
            Some((_, existing)) => *existing = answers.clone(),
            None => self.answers.push((member.clone(), answers.clone())),
        }
        Ok(self.request_if_all_answered())
    }

    fn on_recommendations_requested(&mut self) -> Result<Vec<RoomEffect>, RoomRejection> {
        match self.phase {
            RoomPhase::Collecting => Ok(self.request_shortlist()),
            // Still waiting on the ranker: ask again
            RoomPhase::Recommending => {
                let merged = self.merge_answers();
                self.merged = Some(merged.clone());
                Ok(vec![RoomEffect::ShortlistRequested { merged }])
            }
            RoomPhase::Completed => Err(RoomRejection::Finalized),
            _ => Ok(Vec::new()),
        }
    }

    fn on_shortlist(&mut self, shortlist: &Shortlist, at_ms: u64) -> Result<Vec<RoomEffect>, RoomRejection> {
        let mut effects = Vec::new();
        match self.phase {
            RoomPhase::Recommending => {}
            RoomPhase::Collecting => {
                // Precomputed shortlist, e.g. from a replayed log
                self.merged = Some(self.merge_answers());
                effects.push(self.transition(RoomPhase::Recommending));
            }
            RoomPhase::Voting => return Ok(Vec::new()),
            RoomPhase::Completed => return Err(RoomRejection::Finalized),
            RoomPhase::Abandoned => return Err(RoomRejection::Abandoned),
        }

        self.shortlist = Some(shortlist.clone());
        self.voting_opened_at_ms = Some(at_ms);
        effects.push(RoomEffect::ShortlistInstalled(shortlist.clone()));
        effects.push(self.transition(RoomPhase::Voting));
        effects.push(self.tally_effect());
        effects.extend(self.complete_if_all_voted(at_ms));
        Ok(effects)
    }

    fn on_vote(
        &mut self,
        member: &MemberId,
        restaurant: Option<&RestaurantId>,
        at_ms: u64,
    ) -> Result<Vec<RoomEffect>, RoomRejection> {
        self.ensure_voting()?;
        if let Some(r) = restaurant {
            self.ensure_listed(r)?;
        }

        let changed = match restaurant {
            Some(r) => self.votes.insert(member.clone(), r.clone()).as_ref() != Some(r),
            None => self.votes.remove(member).is_some(),
        };
        if !changed {
            return Ok(Vec::new());
        }

        let mut effects = vec![self.tally_effect()];
        effects.extend(self.complete_if_all_voted(at_ms));
        Ok(effects)
    }

    fn on_swipe(
        &mut self,
        member: &MemberId,
        restaurant: &RestaurantId,
        liked: bool,
    ) -> Result<Vec<RoomEffect>, RoomRejection> {
        self.ensure_voting()?;
        self.ensure_listed(restaurant)?;

        let likes = self.likes.entry(member.clone()).or_default();
        if liked {
            likes.insert(restaurant.clone());
        } else {
            likes.remove(restaurant);
        }
        Ok(Vec::new())
    }

    fn on_finalize(&mut self, choice: Option<&RestaurantId>, at_ms: u64) -> Result<Vec<RoomEffect>, RoomRejection> {
        self.ensure_voting()?;
        let decision = match choice {
            Some(r) => {
                self.ensure_listed(r)?;
                Decision::Winner {
                    restaurant: r.clone(),
                    support: self.tally().get(r),
                    tie_broken: false,
                    source: DecisionSource::Host,
                }
            }
            None => self.resolve(),
        };
        Ok(self.complete(decision, at_ms))
    }

    fn on_retry(&mut self) -> Result<Vec<RoomEffect>, RoomRejection> {
        match self.phase {
            RoomPhase::Completed => match &self.decision {
                Some(Decision::NoResult) => {
                    self.decision = None;
                    self.completed_at_ms = None;
                    self.closing = None;
                    Ok(vec![self.transition(RoomPhase::Voting)])
                }
                _ => Err(RoomRejection::NothingToRetry),
            },
            RoomPhase::Voting => Ok(Vec::new()),
            phase => Err(RoomRejection::VotingNotOpen(phase)),
        }
    }

    fn on_abandon(&mut self) -> Result<Vec<RoomEffect>, RoomRejection> {
        if self.phase == RoomPhase::Completed {
            return Err(RoomRejection::Finalized);
        }
        Ok(vec![self.transition(RoomPhase::Abandoned), RoomEffect::Abandoned])
    }

    // ==================== Transitions ====================

    fn transition(&mut self, to: RoomPhase) -> RoomEffect {
        let from = self.phase;
        self.phase = to;
        RoomEffect::PhaseChanged { from, to }
    }

    fn request_if_all_answered(&mut self) -> Vec<RoomEffect> {
        let all_answered = !self.members.is_empty()
            && self
                .members
                .iter()
                .all(|m| self.answers.iter().any(|(a, _)| a == m));
        if all_answered {
            self.request_shortlist()
        } else {
            Vec::new()
        }
    }

    fn request_shortlist(&mut self) -> Vec<RoomEffect> {
        let merged = self.merge_answers();
        self.merged = Some(merged.clone());
        vec![
            self.transition(RoomPhase::Recommending),
            RoomEffect::ShortlistRequested { merged },
        ]
    }

    fn complete_if_all_voted(&mut self, at_ms: u64) -> Vec<RoomEffect> {
        let (voted, total) = self.vote_counts();
        if self.phase == RoomPhase::Voting && total > 0 && voted >= total {
            let decision = self.resolve();
            self.complete(decision, at_ms)
        } else {
            Vec::new()
        }
    }

    fn complete(&mut self, decision: Decision, at_ms: u64) -> Vec<RoomEffect> {
        let (voted, total) = self.vote_counts();
        self.closing = Some(Closing {
            tally: self.tally(),
            voted,
            total,
        });
        self.decision = Some(decision.clone());
        self.completed_at_ms = Some(at_ms);
        vec![self.transition(RoomPhase::Completed), RoomEffect::Finalized(decision)]
    }

    // ==================== Derived state ====================

    fn ensure_voting(&self) -> Result<(), RoomRejection> {
        match self.phase {
            RoomPhase::Voting => Ok(()),
            RoomPhase::Completed => Err(RoomRejection::Finalized),
            RoomPhase::Abandoned => Err(RoomRejection::Abandoned),
            phase => Err(RoomRejection::VotingNotOpen(phase)),
        }
    }

    fn ensure_listed(&self, restaurant: &RestaurantId) -> Result<(), RoomRejection> {
        if self.shortlist.as_ref().is_some_and(|s| s.contains(restaurant)) {
            Ok(())
        } else {
            Err(RoomRejection::UnknownRestaurant(restaurant.clone()))
        }
    }

    /// Answer sets of current members; every submitter when no member list is known
    fn merge_answers(&self) -> MergedAnswers {
        let sets = self
            .answers
            .iter()
            .filter(|(m, _)| self.members.is_empty() || self.members.contains(m))
            .map(|(_, set)| set);
        self.aggregator.merge(sets)
    }

    fn shortlist_order(&self) -> Vec<&RestaurantId> {
        self.shortlist
            .as_ref()
            .map(|s| s.iter().map(|r| &r.restaurant.id).collect())
            .unwrap_or_default()
    }

    /// Tally over current members' votes only
    pub fn tally(&self) -> Tally {
        let counted = self.members.iter().filter_map(|m| self.votes.get(m));
        Tally::count(self.shortlist_order(), counted)
    }

    /// `(voted, total)` from the same snapshot
    pub fn vote_counts(&self) -> (usize, usize) {
        let voted = self.members.iter().filter(|m| self.votes.contains_key(*m)).count();
        (voted, self.members.len())
    }

    fn tally_effect(&self) -> RoomEffect {
        let (voted, total) = self.vote_counts();
        RoomEffect::TallyChanged {
            tally: self.tally(),
            voted,
            total,
        }
    }

    fn like_tally(&self) -> Tally {
        let counted = self
            .likes
            .iter()
            .filter(|(m, _)| self.members.is_empty() || self.members.contains(m))
            .flat_map(|(_, liked)| liked.iter());
        Tally::count(self.shortlist_order(), counted)
    }

    /// Most votes, then most likes, else no result
    fn resolve(&self) -> Decision {
        let votes = self.tally();
        if let Some(decision) = self.pick(&votes, DecisionSource::Votes) {
            return decision;
        }
        let likes = self.like_tally();
        self.pick(&likes, DecisionSource::Likes)
            .unwrap_or(Decision::NoResult)
    }

    fn pick(&self, tally: &Tally, source: DecisionSource) -> Option<Decision> {
        let leaders = tally.leaders();
        let tie_broken = leaders.len() > 1;
        let restaurant = if tie_broken {
            seeded_shuffle(&leaders, self.code.seed()).first().copied()
        } else {
            leaders.first().copied()
        }?;
        Some(Decision::Winner {
            restaurant: restaurant.clone(),
            support: tally.get(restaurant),
            tie_broken,
            source,
        })
    }

    // ==================== Views ====================

    pub fn view(&self) -> RoomView {
        let (tally, voted, total) = match &self.closing {
            Some(c) => (c.tally.clone(), c.voted, c.total),
            None => {
                let (voted, total) = self.vote_counts();
                (self.tally(), voted, total)
            }
        };
        RoomView {
            code: self.code.clone(),
            phase: self.phase,
            members: self.members.clone(),
            answered: self.answers.len(),
            shortlist: self.shortlist.clone(),
            tally,
            voted,
            total,
            decision: self.decision.clone(),
            summary: self.summary(),
        }
    }

    /// Available once the room has completed
    pub fn summary(&self) -> Option<RoomSummary> {
        let decision = self.decision.clone()?;
        let completed_at = self.completed_at_ms?;
        let closing = self.closing.as_ref()?;
        Some(RoomSummary {
            code: self.code.clone(),
            member_count: closing.total,
            vote_count: closing.voted,
            latency_ms: completed_at.saturating_sub(self.created_at_ms),
            decision,
        })
    }
}
