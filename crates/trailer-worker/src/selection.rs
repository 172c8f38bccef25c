//! Clip ranking and selection.

use std::cmp::Ordering;

use trailer_models::Clip;

/// Sort clips by score, highest first.
///
/// The sort is stable: clips with equal scores keep the order the clip
/// finder returned them in. NaN scores rank below every number.
pub fn rank_clips(mut clips: Vec<Clip>) -> Vec<Clip> {
    clips.sort_by(|a, b| by_score_desc(a.score(), b.score()));
    clips
}

/// Rank `clips` and keep the top `max_clips`.
///
/// `max_clips <= 0` keeps every clip. A cap above the number of clips keeps
/// them all.
pub fn select_clips(clips: Vec<Clip>, max_clips: i64) -> Vec<Clip> {
    let mut ranked = rank_clips(clips);
    if max_clips > 0 {
        ranked.truncate(usize::try_from(max_clips).unwrap_or(usize::MAX));
    }
    ranked
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
