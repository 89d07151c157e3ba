//! Companion matching - overlap of travel styles and interests

use crate::dtos::MatchDTO;
use crate::entities::User;
use std::collections::BTreeSet;

fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.intersection(b).count()
}

/// Number of shared travel styles plus number of shared interests
pub fn score(a: &User, b: &User) -> usize {
    overlap(&a.travel_styles, &b.travel_styles) + overlap(&a.interests, &b.interests)
}

/// Scores every candidate against `me`, best first, ties by user id ascending.
/// `me` is skipped if it appears among the candidates.
pub fn rank_matches(me: &User, candidates: Vec<User>) -> Vec<MatchDTO> {
    let mut ranked: Vec<MatchDTO> = candidates
        .into_iter()
        .filter(|candidate| candidate.user_id != me.user_id)
        .map(|candidate| MatchDTO {
            score: score(me, &candidate),
            id: candidate.user_id,
            username: candidate.username,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
    ranked
}
