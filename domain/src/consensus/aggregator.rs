//! Merging several members' answers into one representative set

use super::rule::ConsensusRule;
use super::selection::SelectionCounts;
use crate::questionnaire::{Answer, AnswerKey, AnswerSet};
use crate::scoring::weights::GROUP_CONSENSUS_WEIGHT;
use serde::{Deserialize, Serialize};

/// Number of pooled fun answers kept after merging
pub const TOP_FUN_ANSWERS: usize = 3;

/// Result of merging a group's answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedAnswers {
    /// One winner per basic question, then the most popular fun answers
    pub answers: AnswerSet,
    pub selection: SelectionCounts,
}

impl MergedAnswers {
    pub fn member_count(&self) -> usize {
        self.selection.member_count()
    }
}

/// Running tally for one label
struct LabelTally<'a> {
    answer: &'a Answer,
    count: u32,
}

/// First-seen ordered tallies; small groups make a linear scan cheaper than hashing
#[derive(Default)]
struct OrderedTally<'a> {
    entries: Vec<LabelTally<'a>>,
}

impl<'a> OrderedTally<'a> {
    fn add(&mut self, answer: &'a Answer) {
        match self.entries.iter_mut().find(|t| t.answer.label == answer.label) {
            Some(t) => t.count += 1,
            None => self.entries.push(LabelTally { answer, count: 1 }),
        }
    }

    /// Highest count; ties keep the earliest-seen label
    fn winner(&self) -> Option<&LabelTally<'a>> {
        self.entries
            .iter()
            .fold(None, |best: Option<&LabelTally<'a>>, t| match best {
                Some(b) if b.count >= t.count => Some(b),
                _ => Some(t),
            })
    }

    /// Top `n` by count, stable on first-seen order
    fn top(&self, n: usize) -> Vec<&LabelTally<'a>> {
        let mut ranked: Vec<&LabelTally<'a>> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

/// Merges per-member answer sets into [`MergedAnswers`]
///
/// Basic questions are tallied per question text; members who skipped a
/// question simply do not count toward it. Fun answers are pooled across
/// every member and question.
///
/// # Example
///
/// ```
/// use tablepick_domain::consensus::ConsensusAggregator;
/// use tablepick_domain::questionnaire::{Answer, AnswerSet, BasicAnswer, SpiceChoice};
///
/// let spicy = |label: &str, choice| {
///     AnswerSet::new().with(Answer::basic("Spicy?", label, BasicAnswer::Spice(choice)))
/// };
/// let sets = vec![
///     spicy("Yes", SpiceChoice::Spicy),
///     spicy("No", SpiceChoice::Mild),
///     spicy("Yes", SpiceChoice::Spicy),
/// ];
///
/// let merged = ConsensusAggregator::default().merge(&sets);
/// assert_eq!(merged.answers.answers()[0].label, "Yes");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConsensusAggregator {
    rule: ConsensusRule,
    group_consensus_weight: f64,
}

impl Default for ConsensusAggregator {
    fn default() -> Self {
        Self::new(ConsensusRule::default(), GROUP_CONSENSUS_WEIGHT)
    }
}

impl ConsensusAggregator {
    pub fn new(rule: ConsensusRule, group_consensus_weight: f64) -> Self {
        Self {
            rule,
            group_consensus_weight,
        }
    }

    pub fn rule(&self) -> ConsensusRule {
        self.rule
    }

    /// Merge answer sets given in first-seen member order
    pub fn merge<'a, I>(&self, member_answers: I) -> MergedAnswers
    where
        I: IntoIterator<Item = &'a AnswerSet>,
    {
        let sets: Vec<&AnswerSet> = member_answers.into_iter().collect();
        let member_count = sets.len();
        let mut selection = SelectionCounts::new(member_count);
        let mut merged = AnswerSet::new();

        // Basic questions, grouped by text in first-seen order
        let mut questions: Vec<(&str, OrderedTally<'_>)> = Vec::new();
        for set in &sets {
            for (answer, _) in set.basic() {
                let idx = match questions.iter().position(|(q, _)| *q == answer.question) {
                    Some(idx) => idx,
                    None => {
                        questions.push((answer.question.as_str(), OrderedTally::default()));
                        questions.len() - 1
                    }
                };
                questions[idx].1.add(answer);
            }
        }

        for (_, tally) in &questions {
            for entry in &tally.entries {
                selection.add(entry.answer.key(), entry.count);
            }
            let Some(winner) = tally.winner() else {
                continue;
            };
            if self.rule.is_satisfied(winner.count as usize, member_count) {
                let boost = (f64::from(winner.count) / member_count as f64
                    * self.group_consensus_weight)
                    .floor();
                if boost.is_finite() && boost > 0.0 {
                    selection.add(winner.answer.key(), boost as u32);
                }
            }
            merged.push(winner.answer.clone());
        }

        // Fun answers, pooled regardless of question
        let mut fun = OrderedTally::default();
        for set in &sets {
            for answer in set.fun() {
                fun.add(answer);
            }
        }
        for entry in &fun.entries {
            selection.add(
                AnswerKey::Fun {
                    label: entry.answer.label.clone(),
                },
                entry.count,
            );
        }
        for entry in fun.top(TOP_FUN_ANSWERS) {
            merged.push(entry.answer.clone());
        }

        MergedAnswers {
            answers: merged,
            selection,
        }
    }
}
