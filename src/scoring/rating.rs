//! MVP podium selection.
//!
//! Two interchangeable strategies sit behind [`MvpSelector`]: an internal
//! performance rating and a 3/2/1 peer vote tally. Neither uses fantasy
//! points.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cli::types::PlayerId;
use crate::scoring::stat::{MvpAward, MvpRank, StatLine};

/// A player who has a stat line in the gameweek and can receive an award.
#[derive(Debug, Clone)]
pub struct MvpCandidate {
    pub player_id: PlayerId,
    pub stat: StatLine,
}

/// One voter's podium: first, second and third pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub picks: [PlayerId; 3],
}

/// Points a ballot gives to its first, second and third pick.
pub const BALLOT_WEIGHTS: [u32; 3] = [3, 2, 1];

pub trait MvpSelector {
    /// Podium awards for the gameweek. Players not returned get no award.
    fn select(&self, candidates: &[MvpCandidate], ballots: &[Ballot]) -> Vec<(PlayerId, MvpAward)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MvpStrategy {
    #[default]
    Votes,
    Rating,
}

impl MvpStrategy {
    pub fn selector(&self, weights: &RatingWeights) -> Box<dyn MvpSelector> {
        match self {
            MvpStrategy::Votes => Box::new(VoteSelector),
            MvpStrategy::Rating => Box::new(RatingSelector::new(weights.clone())),
        }
    }
}

/// Weights for the internal performance score.
///
/// Kept on a larger scale than fantasy points and biased towards goals,
/// assists and defensive work. Penalty weights are magnitudes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingWeights {
    pub presence: i32,
    pub goal: i32,
    pub assist: i32,
    pub clean_sheet: i32,
    pub save: i32,
    pub penalty_scored: i32,
    pub penalty_saved: i32,
    pub nutmeg: i32,
    pub match_won: i32,
    pub defensive_error: i32,
    pub own_goal: i32,
    pub penalty_missed: i32,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            presence: 2,
            goal: 10,
            assist: 7,
            clean_sheet: 6,
            save: 2,
            penalty_scored: 8,
            penalty_saved: 8,
            nutmeg: 3,
            match_won: 4,
            defensive_error: 6,
            own_goal: 8,
            penalty_missed: 5,
        }
    }
}

/// Performance score for one stat line. Ignores any existing MVP award.
pub fn performance_score(stat: &StatLine, weights: &RatingWeights) -> i64 {
    let n = |v: u32| i64::from(v);
    let w = |v: i32| i64::from(v);

    let mut score = 0;
    if stat.played() {
        score += w(weights.presence);
    }
    score += n(stat.goals) * w(weights.goal);
    score += n(stat.assists) * w(weights.assist);
    score += n(stat.clean_sheet) * w(weights.clean_sheet);
    score += n(stat.saves) * w(weights.save);
    score += n(stat.penalties_scored) * w(weights.penalty_scored);
    score += n(stat.penalties_saved) * w(weights.penalty_saved);
    score += n(stat.nutmegs) * w(weights.nutmeg);
    score += n(stat.matches_won) * w(weights.match_won);
    score -= n(stat.defensive_errors) * w(weights.defensive_error);
    score -= n(stat.own_goals) * w(weights.own_goal);
    score -= n(stat.penalties_missed) * w(weights.penalty_missed);
    score
}

/// Ranks players who played by performance score.
///
/// The three highest distinct scores take ranks 1-3 and every player on a
/// given score shares its rank, so a podium can hold more than three players.
#[derive(Debug, Clone, Default)]
pub struct RatingSelector {
    weights: RatingWeights,
}

impl RatingSelector {
    pub fn new(weights: RatingWeights) -> Self {
        Self { weights }
    }
}

impl MvpSelector for RatingSelector {
    fn select(&self, candidates: &[MvpCandidate], _ballots: &[Ballot]) -> Vec<(PlayerId, MvpAward)> {
        let scored: Vec<(PlayerId, i64)> = candidates
            .iter()
            .filter(|c| c.stat.played())
            .map(|c| (c.player_id, performance_score(&c.stat, &self.weights)))
            .collect();

        let mut podium_scores: Vec<i64> = scored.iter().map(|(_, score)| *score).collect();
        podium_scores.sort_unstable_by(|a, b| b.cmp(a));
        podium_scores.dedup();
        podium_scores.truncate(3);

        scored
            .into_iter()
            .filter_map(|(player_id, score)| {
                let place = podium_scores.iter().position(|s| *s == score)?;
                let rank = MvpRank::new(u8::try_from(place + 1).ok()?)?;
                Some((player_id, MvpAward::Rated(rank)))
            })
            .collect()
    }
}

/// Weighted tally of ballots in first-seen order.
///
/// Only picks present in `eligible` are counted when it is given. The
/// returned order is the order in which players first appear on a ballot.
pub fn tally_votes(ballots: &[Ballot], eligible: Option<&[PlayerId]>) -> Vec<(PlayerId, u32)> {
    let mut order: Vec<(PlayerId, u32)> = Vec::new();
    let mut index: HashMap<PlayerId, usize> = HashMap::new();

    for ballot in ballots {
        for (pick, weight) in ballot.picks.iter().zip(BALLOT_WEIGHTS) {
            if eligible.is_some_and(|ids| !ids.contains(pick)) {
                continue;
            }
            let slot = *index.entry(*pick).or_insert_with(|| {
                order.push((*pick, 0));
                order.len() - 1
            });
            order[slot].1 += weight;
        }
    }
    order
}

/// Ranks candidates by peer vote tally.
///
/// Ranks 1-3 go to the three highest tallies. Equal tallies keep the order in
/// which players first appeared on a ballot, which is submission order; this
/// is not a strict total order and two identical vote sets submitted in a
/// different order can place tied players differently.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteSelector;

impl MvpSelector for VoteSelector {
    fn select(&self, candidates: &[MvpCandidate], ballots: &[Ballot]) -> Vec<(PlayerId, MvpAward)> {
        let eligible: Vec<PlayerId> = candidates.iter().map(|c| c.player_id).collect();
        let mut tally = tally_votes(ballots, Some(eligible.as_slice()));
        // Stable sort keeps first-seen order among ties
        tally.sort_by(|a, b| b.1.cmp(&a.1));

        tally
            .into_iter()
            .filter(|(_, points)| *points > 0)
            .take(3)
            .zip([MvpRank::FIRST, MvpRank::SECOND, MvpRank::THIRD])
            .map(|((player_id, _), rank)| (player_id, MvpAward::Voted(rank)))
            .collect()
    }
}
