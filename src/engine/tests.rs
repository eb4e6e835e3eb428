//! Unit tests for the scoring and ranking engine

use super::*;
use std::collections::BTreeSet;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn record(match_id: &str, team1: &str, team2: &str) -> MatchRecord {
    MatchRecord {
        match_id: match_id.to_string(),
        team1: team1.to_string(),
        team2: team2.to_string(),
        scorers1: vec!["Al".to_string(), "Bo".to_string()],
        scorers2: vec!["Cy".to_string(), "Di".to_string()],
    }
}

fn engine_with_round_one() -> PredictionEngine {
    let engine = PredictionEngine::default();
    engine
        .load_round(
            Authorization::Admin,
            RoundId::new(1),
            vec![record("A", "Lions", "Tigers"), record("B", "Bears", "Wolves")],
        )
        .unwrap();
    engine
}

fn predict(engine: &PredictionEngine, user: u64, match_id: &str, outcome: &str, s1: &str, s2: &str) {
    engine
        .submit_prediction(
            UserId::new(user),
            RoundId::new(1),
            MatchId::new(match_id),
            outcome.parse().unwrap(),
            s1,
            s2,
        )
        .unwrap();
}

fn result(engine: &PredictionEngine, match_id: &str, outcome: &str, s1: &str, s2: &str) -> RoundScoring {
    engine
        .submit_result(
            Authorization::Admin,
            RoundId::new(1),
            MatchId::new(match_id),
            outcome.parse().unwrap(),
            s1,
            s2,
        )
        .unwrap()
        .1
}

#[cfg(test)]
mod scoring_tests {
    use super::*;
    use crate::engine::scoring::{outcome_points, scorer_points, score_user_round};

    fn prediction(outcome: Outcome, scorers: &[&str]) -> Prediction {
        Prediction {
            user: UserId::new(1),
            round: RoundId::new(1),
            match_id: MatchId::new("A"),
            outcome,
            scorers: names(scorers),
        }
    }

    fn actual(outcome: Outcome, scorers: &[&str]) -> MatchResult {
        MatchResult {
            round: RoundId::new(1),
            match_id: MatchId::new("A"),
            outcome,
            scorers: names(scorers),
        }
    }

    #[test]
    fn test_correct_draw_scores_four() {
        assert_eq!(outcome_points(&Outcome::Draw, &Outcome::Draw), 4);
    }

    #[test]
    fn test_correct_winner_scores_one() {
        assert_eq!(
            outcome_points(&Outcome::winner("Lions"), &Outcome::winner("Lions")),
            1
        );
    }

    #[test]
    fn test_wrong_outcome_scores_zero() {
        assert_eq!(outcome_points(&Outcome::Draw, &Outcome::winner("Lions")), 0);
        assert_eq!(outcome_points(&Outcome::winner("Lions"), &Outcome::Draw), 0);
        assert_eq!(
            outcome_points(&Outcome::winner("Lions"), &Outcome::winner("Tigers")),
            0
        );
    }

    #[test]
    fn test_team_names_compare_case_sensitively() {
        assert_eq!(
            outcome_points(&Outcome::winner("lions"), &Outcome::winner("Lions")),
            0
        );
    }

    #[test]
    fn test_scorer_points_by_intersection() {
        let real = names(&["Al", "Di"]);
        assert_eq!(scorer_points(&names(&["Di", "Al"]), &real), 2);
        assert_eq!(scorer_points(&names(&["Al", "Cy"]), &real), 1);
        assert_eq!(scorer_points(&names(&["Bo", "Cy"]), &real), 0);
        assert_eq!(scorer_points(&names(&["al"]), &real), 0);
    }

    #[test]
    fn test_scorer_points_independent_of_outcome() {
        let score = score_prediction(
            &prediction(Outcome::winner("Tigers"), &["Al", "Di"]),
            &actual(Outcome::winner("Lions"), &["Al", "Di"]),
        );
        assert_eq!(score.outcome_points, 0);
        assert_eq!(score.scorer_points, 2);
        assert_eq!(score.total(), 2);
    }

    #[test]
    fn test_draw_with_scorers() {
        let score = score_prediction(
            &prediction(Outcome::Draw, &["Al", "Zed"]),
            &actual(Outcome::Draw, &["Al"]),
        );
        assert_eq!(score.total(), 5);
    }

    #[test]
    fn test_user_round_without_results_is_unscored() {
        let mut picks = BTreeMap::new();
        picks.insert(MatchId::new("A"), prediction(Outcome::Draw, &[]));
        let results = BTreeMap::new();
        assert_eq!(score_user_round(&picks, &results), None);
    }

    #[test]
    fn test_user_round_zero_points_is_still_scored() {
        let mut picks = BTreeMap::new();
        picks.insert(MatchId::new("A"), prediction(Outcome::Draw, &["Bo"]));
        let mut results = BTreeMap::new();
        results.insert(MatchId::new("A"), actual(Outcome::winner("Lions"), &["Al"]));
        assert_eq!(score_user_round(&picks, &results), Some(0));
    }

    #[test]
    fn test_scoreboard_replaces_round() {
        let mut board = Scoreboard::new();
        let user = UserId::new(9);

        board.replace_round(RoundId::new(1), BTreeMap::from([(user, 3)]));
        board.replace_round(RoundId::new(2), BTreeMap::from([(user, 2)]));
        assert_eq!(board.total_for(user), Some(5));

        // Second pass over round 1 overwrites rather than adds
        board.replace_round(RoundId::new(1), BTreeMap::from([(user, 1)]));
        assert_eq!(board.total_for(user), Some(3));

        board.replace_round(RoundId::new(2), BTreeMap::new());
        assert!(board.round(RoundId::new(2)).is_none());
        assert_eq!(board.totals().get(&user), Some(&1));
    }
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use crate::engine::catalog::split_scorers;

    const UPLOAD: &str = "round,match,team1,team2,scorers1,scorers2
1,A,Lions,Tigers,Al;Bo,Cy;Di
1,B,Bears,Wolves,Ed;;Fi,Gus
2,A,Lions,Bears,Al,Ed
";

    #[test]
    fn test_parse_catalog_csv() {
        let rows = parse_catalog_csv(UPLOAD).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].round, RoundId::new(1));
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].record.scorers1, vec!["Al", "Bo"]);
        // Empty entries in a scorer list are discarded
        assert_eq!(rows[1].record.scorers1, vec!["Ed", "Fi"]);
        assert_eq!(rows[2].round, RoundId::new(2));
    }

    #[test]
    fn test_parse_catalog_skips_header_and_blank_lines() {
        let rows = parse_catalog_csv("\u{feff}header\n\n1,A,Lions,Tigers,,\n\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].record.scorers1.is_empty());
    }

    #[test]
    fn test_parse_catalog_wrong_field_count() {
        let err = parse_catalog_csv("h\n1,A,Lions,Tigers,Al\n").unwrap_err();
        match err {
            PredictorError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 6 fields, found 5"));
            }
            _ => panic!("Expected MalformedRecord error"),
        }
    }

    #[test]
    fn test_parse_catalog_bad_round() {
        let err = parse_catalog_csv("h\n1,A,Lions,Tigers,,\nx,B,Bears,Wolves,,\n").unwrap_err();
        match err {
            PredictorError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            _ => panic!("Expected MalformedRecord error"),
        }
    }

    #[test]
    fn test_reserved_and_duplicate_team_names() {
        assert!(parse_catalog_csv("h\n1,A,Draw,Tigers,,\n").is_err());
        assert!(parse_catalog_csv("h\n1,A,Lions,Lions,,\n").is_err());
        assert!(parse_catalog_csv("h\n1,,Lions,Tigers,,\n").is_err());
    }

    #[test]
    fn test_split_scorers() {
        assert_eq!(split_scorers(" Al ; Bo;"), vec!["Al", "Bo"]);
        assert!(split_scorers("").is_empty());
    }

    #[test]
    fn test_load_round_replaces_match() {
        let mut catalog = MatchCatalog::new();
        let round = RoundId::new(1);
        catalog
            .load_round(round, vec![record("A", "Lions", "Tigers")])
            .unwrap();
        catalog
            .load_round(round, vec![record("A", "Bears", "Wolves")])
            .unwrap();

        let game = catalog.get(round, &MatchId::new("A")).unwrap();
        assert!(game.has_team("Bears"));
        assert!(!game.has_team("Lions"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_round_is_all_or_nothing() {
        let mut catalog = MatchCatalog::new();
        let result = catalog.load_round(
            RoundId::new(1),
            vec![record("A", "Lions", "Tigers"), record("B", "", "Wolves")],
        );
        assert!(result.is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_match_admits_outcomes() {
        let mut catalog = MatchCatalog::new();
        catalog
            .load_round(RoundId::new(1), vec![record("A", "Lions", "Tigers")])
            .unwrap();
        let game = catalog.get(RoundId::new(1), &MatchId::new("A")).unwrap();
        assert!(game.admits(&Outcome::Draw));
        assert!(game.admits(&Outcome::winner("Tigers")));
        assert!(!game.admits(&Outcome::winner("Bears")));
    }
}

#[cfg(test)]
mod leaderboard_tests {
    use super::*;

    fn totals(entries: &[(u64, Points)]) -> BTreeMap<UserId, Points> {
        entries
            .iter()
            .map(|(user, points)| (UserId::new(*user), *points))
            .collect()
    }

    #[test]
    fn test_rebuild_orders_by_points_then_user() {
        let board = Leaderboard::rebuild(&totals(&[(30, 5), (10, 2), (20, 5), (5, 7)]));
        let order: Vec<u64> = board.standings().iter().map(|s| s.user.as_u64()).collect();
        assert_eq!(order, vec![5, 20, 30, 10]);
        assert_eq!(board.standings()[0].rank, 1);
        assert_eq!(board.standings()[3].rank, 4);
    }

    #[test]
    fn test_rebuild_is_stable() {
        let input = totals(&[(3, 1), (1, 1), (2, 1)]);
        let first = Leaderboard::rebuild(&input);
        let second = Leaderboard::rebuild(&input);
        assert_eq!(first.standings(), second.standings());
        assert_eq!(first.standings()[0].user, UserId::new(1));
    }

    #[test]
    fn test_top_truncates() {
        let board = Leaderboard::rebuild(&totals(&[(1, 3), (2, 2)]));
        assert_eq!(board.top(1).len(), 1);
        assert_eq!(board.top(10).len(), 2);
        assert!(board.top(0).is_empty());
        assert!(Leaderboard::default().top(5).is_empty());
    }

    #[test]
    fn test_rank_of() {
        let board = Leaderboard::rebuild(&totals(&[(1, 3), (2, 9)]));
        assert_eq!(board.rank_of(UserId::new(1)).unwrap().rank, 2);
        assert_eq!(board.rank_of(UserId::new(2)).unwrap().points, 9);
        assert!(board.rank_of(UserId::new(3)).is_none());
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn test_end_to_end_round() {
        let engine = PredictionEngine::default();
        engine
            .load_round(
                Authorization::Admin,
                RoundId::new(1),
                vec![record("A", "Lions", "Tigers")],
            )
            .unwrap();

        predict(&engine, 1, "A", "Lions", "Al", "Cy");
        let scoring = result(&engine, "A", "Lions", "Al", "Di");

        assert_eq!(scoring.awarded.get(&UserId::new(1)), Some(&2));
        let top = engine.top(1);
        assert_eq!(top.len(), 1);
        assert_eq!((top[0].user, top[0].points), (UserId::new(1), 2));
        assert_eq!(engine.rank_of(UserId::new(1)).unwrap().rank, 1);
    }

    #[test]
    fn test_result_correction_does_not_double_count() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "Al", "Cy");

        result(&engine, "A", "Lions", "Al", "Cy");
        assert_eq!(engine.total_for(UserId::new(1)), Some(3));

        result(&engine, "A", "Tigers", "Di", "");
        engine.rescore_round(RoundId::new(1));
        assert_eq!(engine.total_for(UserId::new(1)), Some(0));

        // Same as if only the corrected result had been submitted
        let fresh = engine_with_round_one();
        predict(&fresh, 1, "A", "Lions", "Al", "Cy");
        result(&fresh, "A", "Tigers", "Di", "");
        assert_eq!(fresh.total_for(UserId::new(1)), engine.total_for(UserId::new(1)));
    }

    #[test]
    fn test_repeated_rescore_is_idempotent() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "draw", "Al", "");
        result(&engine, "A", "draw", "Al", "Bo");

        for _ in 0..3 {
            engine.rescore_round(RoundId::new(1));
        }
        engine.rescore_all();
        assert_eq!(engine.total_for(UserId::new(1)), Some(5));
    }

    #[test]
    fn test_totals_accumulate_across_matches_and_rounds() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "", "");
        predict(&engine, 1, "B", "draw", "", "");
        result(&engine, "A", "Lions", "", "");
        result(&engine, "B", "draw", "", "");
        assert_eq!(engine.total_for(UserId::new(1)), Some(5));

        engine
            .submit_prediction(
                UserId::new(1),
                RoundId::new(2),
                MatchId::new("A"),
                Outcome::winner("Bears"),
                "Ed",
                "",
            )
            .unwrap();
        engine
            .submit_result(
                Authorization::Admin,
                RoundId::new(2),
                MatchId::new("A"),
                Outcome::winner("Bears"),
                "Ed",
                "",
            )
            .unwrap();
        assert_eq!(engine.total_for(UserId::new(1)), Some(7));
    }

    #[test]
    fn test_overwritten_prediction_is_ignored() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "Al", "Bo");
        predict(&engine, 1, "A", "Tigers", "Cy", "");

        let stored = engine
            .prediction(UserId::new(1), RoundId::new(1), &MatchId::new("A"))
            .unwrap();
        assert_eq!(stored.outcome, Outcome::winner("Tigers"));
        assert_eq!(stored.scorers, names(&["Cy"]));

        result(&engine, "A", "Lions", "Al", "Bo");
        assert_eq!(engine.total_for(UserId::new(1)), Some(0));
    }

    #[test]
    fn test_prediction_does_not_rescore() {
        let engine = engine_with_round_one();
        result(&engine, "A", "Lions", "", "");
        predict(&engine, 1, "A", "Lions", "", "");
        assert_eq!(engine.total_for(UserId::new(1)), None);

        engine.rescore_round(RoundId::new(1));
        assert_eq!(engine.total_for(UserId::new(1)), Some(1));
    }

    #[test]
    fn test_unscored_user_is_not_found() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "", "");
        predict(&engine, 2, "B", "Bears", "", "");
        result(&engine, "A", "Tigers", "", "");

        // User 1 scored zero but is recorded; user 2 has no result yet
        assert_eq!(engine.rank_of(UserId::new(1)).unwrap().points, 0);
        match engine.rank_of(UserId::new(2)) {
            Err(PredictorError::NotFound { user }) => assert_eq!(user, UserId::new(2)),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_leaderboard_ties_break_by_user_id() {
        let engine = engine_with_round_one();
        predict(&engine, 30, "A", "Lions", "", "");
        predict(&engine, 10, "A", "Lions", "", "");
        predict(&engine, 20, "A", "draw", "", "");
        result(&engine, "A", "Lions", "", "");

        let users: Vec<u64> = engine.top(10).iter().map(|s| s.user.as_u64()).collect();
        assert_eq!(users, vec![10, 30, 20]);
    }

    #[test]
    fn test_privileged_operations_require_admin() {
        let engine = PredictionEngine::default();
        let err = engine
            .load_round(
                Authorization::Member,
                RoundId::new(1),
                vec![record("A", "Lions", "Tigers")],
            )
            .unwrap_err();
        assert!(matches!(err, PredictorError::Unauthorized { .. }));
        assert!(engine.matches(RoundId::new(1)).is_empty());

        let err = engine
            .submit_result(
                Authorization::Member,
                RoundId::new(1),
                MatchId::new("A"),
                Outcome::Draw,
                "",
                "",
            )
            .unwrap_err();
        assert!(matches!(err, PredictorError::Unauthorized { .. }));
        assert!(engine.result(RoundId::new(1), &MatchId::new("A")).is_none());
    }

    #[test]
    fn test_unlisted_match_is_flagged() {
        let engine = engine_with_round_one();
        let receipt = engine
            .submit_prediction(
                UserId::new(1),
                RoundId::new(4),
                MatchId::new("Z"),
                Outcome::Draw,
                "",
                "",
            )
            .unwrap();
        assert_eq!(receipt.catalog, CatalogCheck::UnlistedMatch);

        let receipt = engine
            .submit_prediction(
                UserId::new(1),
                RoundId::new(1),
                MatchId::new("A"),
                Outcome::winner("Bears"),
                "",
                "",
            )
            .unwrap();
        assert_eq!(receipt.catalog, CatalogCheck::UnlistedOutcome);
    }

    #[test]
    fn test_strict_catalog_rejects_unknown_references() {
        let engine = PredictionEngine::new(EngineConfig {
            strict_catalog: true,
            ..EngineConfig::default()
        });
        let err = engine
            .submit_prediction(
                UserId::new(1),
                RoundId::new(1),
                MatchId::new("A"),
                Outcome::Draw,
                "",
                "",
            )
            .unwrap_err();
        match err {
            PredictorError::UnknownReference {
                operation, round, ..
            } => {
                assert_eq!(operation, "predict");
                assert_eq!(round, RoundId::new(1));
            }
            _ => panic!("Expected UnknownReference error"),
        }
        assert!(engine.predictions_for(UserId::new(1)).is_empty());
    }

    #[test]
    fn test_load_catalog_all_or_nothing() {
        let engine = PredictionEngine::default();
        let mut rows = parse_catalog_csv("h\n1,A,Lions,Tigers,,\n2,A,Bears,Wolves,,\n").unwrap();
        rows[1].record.team2 = String::new();

        assert!(engine.load_catalog(Authorization::Admin, rows).is_err());
        assert!(engine.matches(RoundId::new(1)).is_empty());

        let rows = parse_catalog_csv("h\n1,A,Lions,Tigers,,\n2,A,Bears,Wolves,,\n").unwrap();
        let loaded = engine.load_catalog(Authorization::Admin, rows).unwrap();
        assert_eq!(loaded.get(&RoundId::new(1)), Some(&1));
        assert_eq!(loaded.get(&RoundId::new(2)), Some(&1));
    }

    fn saved_inputs(engine: &PredictionEngine, users: &[u64], scoring: &RoundScoring) -> EngineInputs {
        EngineInputs {
            matches: engine
                .matches(RoundId::new(1))
                .into_iter()
                .map(|game| (RoundId::new(1), game))
                .collect(),
            predictions: users
                .iter()
                .flat_map(|user| engine.predictions_for(UserId::new(*user)))
                .collect(),
            results: vec![engine.result(RoundId::new(1), &MatchId::new("A")).unwrap()],
            subtotals: BTreeMap::from([(scoring.round, scoring.awarded.clone())]),
        }
    }

    #[test]
    fn test_restore_keeps_scores() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "Al", "");
        let scoring = result(&engine, "A", "Lions", "Al", "");

        let restored =
            PredictionEngine::restore(EngineConfig::default(), saved_inputs(&engine, &[1], &scoring));
        assert_eq!(restored.total_for(UserId::new(1)), Some(2));
        assert_eq!(restored.rank_of(UserId::new(1)).unwrap().rank, 1);
        assert_eq!(restored.matches(RoundId::new(1)).len(), 2);
    }

    #[test]
    fn test_restore_does_not_score_late_prediction() {
        let engine = engine_with_round_one();
        let scoring = result(&engine, "A", "Lions", "Al", "Di");
        predict(&engine, 7, "A", "Lions", "Al", "Di");
        assert!(engine.rank_of(UserId::new(7)).is_err());

        let restored =
            PredictionEngine::restore(EngineConfig::default(), saved_inputs(&engine, &[7], &scoring));
        assert!(matches!(
            restored.rank_of(UserId::new(7)),
            Err(PredictorError::NotFound { .. })
        ));
        assert!(restored.top(10).is_empty());

        // The pick counts once the round is rescored
        restored.rescore_round(RoundId::new(1));
        assert_eq!(restored.total_for(UserId::new(7)), Some(3));
    }

    #[test]
    fn test_reset_clears_everything() {
        let engine = engine_with_round_one();
        predict(&engine, 1, "A", "Lions", "", "");
        result(&engine, "A", "Lions", "", "");

        assert!(matches!(
            engine.reset(Authorization::Member),
            Err(PredictorError::Unauthorized { .. })
        ));
        assert_eq!(engine.total_for(UserId::new(1)), Some(1));

        engine.reset(Authorization::Admin).unwrap();
        assert!(engine.matches(RoundId::new(1)).is_empty());
        assert!(engine.predictions_for(UserId::new(1)).is_empty());
        assert!(engine.result(RoundId::new(1), &MatchId::new("A")).is_none());
        assert_eq!(engine.total_for(UserId::new(1)), None);
        assert!(engine.leaderboard().is_empty());
    }

    #[test]
    fn test_concurrent_submissions() {
        let engine = Arc::new(engine_with_round_one());
        result(&engine, "A", "Lions", "Al", "");

        let handles: Vec<_> = (1..=8u64)
            .map(|user| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    predict(&engine, user, "A", "Lions", "Al", "");
                    engine.rescore_round(RoundId::new(1));
                    engine.top(3)
                })
            })
            .collect();
        for handle in handles {
            let top = handle.join().unwrap();
            assert!(top.len() <= 3);
        }

        engine.rescore_round(RoundId::new(1));
        let board = engine.leaderboard();
        assert_eq!(board.len(), 8);
        assert!(board.standings().iter().all(|s| s.points == 2));
        assert_eq!(board.standings()[0].user, UserId::new(1));
    }
}
