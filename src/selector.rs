//! # Route selection
//! Ranks the scored candidates and picks the eco (best) and standard (worst) route.
//!
//! Policy: with one candidate nothing can be compared, so the route is both
//! best and worst and both scores are reported as neutral 50. With two or
//! more, a stable descending sort decides; among equal scores the first
//! candidate wins "best" and the last one is "worst".

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::normalize::NEUTRAL_SCORE;
use crate::route::{CandidateSet, RouteCandidate};
use crate::scoring::{round1, score_candidates, ScoredRoute, SubScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    SingleRoute,
    EcoscoreV4,
}

/// Comparison summary between the selected routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub strategy: SelectionStrategy,
    pub eco_score: f64,
    pub standard_score: f64,
    pub difference: f64,
    pub comparison: String,
    pub eco_sub_scores: SubScores,
    pub standard_sub_scores: SubScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub worst_route: ScoredRoute,
    pub best_route: ScoredRoute,
    pub analysis: Analysis,
    /// Every candidate, in original order.
    pub ranking: Vec<ScoredRoute>,
}

/// Extract, score and select in one pass. Fails on the first malformed candidate
/// or when no candidate is given.
pub fn score_and_select(candidates: &[RouteCandidate]) -> Result<SelectionResult, EngineError> {
    let set = CandidateSet::extract(candidates)?;
    select(&set)
}

/// Select over an already extracted set. An empty set is rejected here, so
/// callers need not check it themselves.
pub fn select(set: &CandidateSet) -> Result<SelectionResult, EngineError> {
    if set.is_empty() {
        return Err(EngineError::malformed(0, "at least one candidate route is required"));
    }
    let scored = score_candidates(set);

    let (best, worst, strategy) = match scored.len() {
        1 => {
            let mut only = scored[0].clone();
            only.ecoscore = NEUTRAL_SCORE;
            (only.clone(), only, SelectionStrategy::SingleRoute)
        }
        _ => {
            let mut ranked: Vec<&ScoredRoute> = scored.iter().collect();
            // `sort_by` is stable: ties keep candidate order.
            ranked.sort_by(|a, b| b.ecoscore.total_cmp(&a.ecoscore));
            let best = ranked[0].clone();
            let worst = ranked[ranked.len() - 1].clone();
            (best, worst, SelectionStrategy::EcoscoreV4)
        }
    };

    let analysis = analyze(&best, &worst, strategy);

    info!(
        target: "ecoscore",
        candidates = scored.len(),
        strategy = ?strategy,
        best = best.index,
        worst = worst.index,
        eco_score = analysis.eco_score,
        standard_score = analysis.standard_score,
        "routes selected"
    );

    Ok(SelectionResult {
        worst_route: worst,
        best_route: best,
        analysis,
        ranking: scored,
    })
}

fn analyze(best: &ScoredRoute, worst: &ScoredRoute, strategy: SelectionStrategy) -> Analysis {
    let difference = round1(best.ecoscore - worst.ecoscore);
    let comparison = match strategy {
        SelectionStrategy::SingleRoute => {
            "Only one route available: no comparison possible (neutral score 50).".to_string()
        }
        SelectionStrategy::EcoscoreV4 => format!(
            "Eco route scores {:.1} vs {:.1} for the standard route ({}% more efficient).",
            best.ecoscore,
            worst.ecoscore,
            difference.trunc() as i64
        ),
    };

    Analysis {
        strategy,
        eco_score: best.ecoscore,
        standard_score: worst.ecoscore,
        difference,
        comparison,
        eco_sub_scores: best.sub_scores,
        standard_sub_scores: worst.sub_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(distance_m: f64, duration_s: f64, steps: u32) -> RouteCandidate {
        RouteCandidate::single_leg(distance_m, duration_s, Some(duration_s), steps)
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = score_and_select(&[]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRoute { .. }));
    }

    #[test]
    fn empty_extracted_set_is_rejected() {
        let err = select(&CandidateSet::from_metrics(Vec::new())).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRoute { index: 0, .. }));
    }

    #[test]
    fn single_route_is_both_best_and_worst() {
        let r = score_and_select(&[route(8_000.0, 900.0, 6)]).unwrap();
        assert_eq!(r.best_route.index, 0);
        assert_eq!(r.worst_route.index, 0);
        assert_eq!(r.best_route.ecoscore, 50.0);
        assert_eq!(r.worst_route.ecoscore, 50.0);
        assert_eq!(r.analysis.strategy, SelectionStrategy::SingleRoute);
        assert_eq!(r.analysis.difference, 0.0);
    }

    #[test]
    fn picks_highest_and_lowest() {
        let r = score_and_select(&[
            route(10_000.0, 1200.0, 4),
            route(10_800.0, 1080.0, 2),
        ])
        .unwrap();
        assert_eq!(r.best_route.index, 1);
        assert_eq!(r.worst_route.index, 0);
        assert_eq!(r.analysis.strategy, SelectionStrategy::EcoscoreV4);
        assert_eq!(r.analysis.eco_score, 61.1);
        assert_eq!(r.analysis.standard_score, 59.1);
        assert_eq!(r.analysis.difference, 2.0);
        assert!(r.analysis.comparison.contains("61.1"));
        assert!(r.analysis.comparison.contains("59.1"));
        assert!(r.analysis.comparison.contains("(2%"));
        assert_eq!(r.ranking.len(), 2);
    }

    #[test]
    fn ties_keep_first_best_and_last_worst() {
        let same = route(5_000.0, 600.0, 2);
        let r = score_and_select(&[same.clone(), same.clone(), same]).unwrap();
        assert_eq!(r.best_route.index, 0);
        assert_eq!(r.worst_route.index, 2);
        assert_eq!(r.analysis.difference, 0.0);
    }

    #[test]
    fn malformed_candidate_aborts_selection() {
        let broken = RouteCandidate {
            summary: None,
            legs: vec![],
        };
        let err = score_and_select(&[route(1_000.0, 60.0, 0), broken]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRoute { index: 1, .. }));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let input = vec![
            route(12_000.0, 1500.0, 10),
            route(9_000.0, 1700.0, 4),
            route(15_000.0, 1300.0, 8),
        ];
        let a = score_and_select(&input).unwrap();
        let b = score_and_select(&input).unwrap();
        assert_eq!(a, b);
    }
}
