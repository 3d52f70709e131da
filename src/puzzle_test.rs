/// Tests for puzzle module
#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::Engine;
    use crate::puzzle::{Abandoned, PuzzleGenerator};
    use crate::testutil::{MockDirectory, MockSource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{BTreeMap, BTreeSet};

    fn key_for(name: &str) -> String {
        name.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "")
    }

    /// Every player on a team is a teammate of every other player on it
    fn league(teams: &[&[&str]]) -> MockSource {
        let mut rosters: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for team in teams {
            for &player in team.iter() {
                let entry = rosters.entry(player).or_default();
                for &mate in team.iter().filter(|m| **m != player) {
                    if !entry.contains(&mate) {
                        entry.push(mate);
                    }
                }
            }
        }

        rosters.into_iter().fold(MockSource::new(), |source, (player, mates)| {
            let rows: Vec<(&str, u32)> = mates.into_iter().map(|m| (m, 82)).collect();
            source.with_player(player, &key_for(player), &rows)
        })
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const TEAMS: &[&[&str]] = &[
        &["Ann Arbor", "Ben Bishop", "Cal Carter", "Dan Dunn", "Eli Evans"],
        &["Ann Arbor", "Fay Frost", "Gus Grant", "Hal Hope"],
        &["Ben Bishop", "Fay Frost", "Ivy Irwin", "Jon Jones", "Kim Kurt"],
        &["Cal Carter", "Gus Grant", "Jon Jones", "Lee Lowe", "Max Moss"],
        &["Dan Dunn", "Hal Hope", "Kim Kurt", "Max Moss", "Ned Nash"],
    ];

    #[test]
    fn test_guaranteed_answer_always_in_answer_set() {
        let source = league(TEAMS);
        let directory: BTreeSet<String> = TEAMS.iter().flat_map(|t| t.iter()).map(|s| s.to_string()).collect();
        let engine = Engine::new(&source, MockDirectory(directory.into_iter().collect()), &EngineConfig::default());

        let mut built = 0;
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let Some(puzzle) = engine.generate_puzzle_with_rng(&mut rng, 5, 0).unwrap() else {
                continue;
            };
            built += 1;

            assert!(puzzle.all_answers.contains(&puzzle.guaranteed_answer), "seed {}: {:?}", seed, puzzle);

            let distinct: BTreeSet<&String> = puzzle.clues.iter().collect();
            assert_eq!(distinct.len(), 3, "seed {}: clues must be distinct", seed);

            let answer_roster = engine.roster(&engine.resolve(&puzzle.guaranteed_answer)[0], 0);
            for clue in &puzzle.clues {
                assert!(answer_roster.contains(clue), "seed {}: {} is not a teammate of {}", seed, clue, puzzle.guaranteed_answer);
            }
        }
        assert!(built > 100, "only {} of 200 seeds produced a puzzle", built);
    }

    #[test]
    fn test_thin_roster_exhausts_single_trial() {
        let source = MockSource::new().with_player("Rookie Guy", "guyro01", &[("Vet One", 50), ("Vet Two", 50)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Rookie Guy"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(engine.generate_puzzle_with_rng(&mut rng, 1, 0).unwrap(), None);
        assert_eq!(source.search_calls(), 1);
    }

    #[test]
    fn test_duplicate_roster_rows_do_not_count_as_distinct_clues() {
        let source = MockSource::new().with_player(
            "Rookie Guy",
            "guyro01",
            &[("Vet One", 50), ("Vet Two", 50), ("Vet One", 30), ("Vet Two", 20)],
        );
        let engine = Engine::new(&source, MockDirectory(names(&["Rookie Guy"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(3);
        let err = PuzzleGenerator::default().run_trial(&engine, &names(&["Rookie Guy"]), &mut rng, 0).unwrap_err();
        assert_eq!(err, Abandoned::ThinRoster { candidate: "Rookie Guy".to_string(), distinct: 2 });
    }

    #[test]
    fn test_candidate_missing_from_clue_rosters_is_inserted() {
        // Alpha lists B, C and D, but none of them list Alpha back
        let source = MockSource::new()
            .with_player("Alpha One", "alpha01", &[("Bravo Two", 10), ("Charlie Three", 10), ("Delta Four", 10)])
            .with_player("Bravo Two", "bravo01", &[("Zed Zulu", 10)])
            .with_player("Charlie Three", "charl01", &[("Zed Zulu", 10)])
            .with_player("Delta Four", "delta01", &[("Zed Zulu", 10)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(11);
        let puzzle = engine.generate_puzzle_with_rng(&mut rng, 1, 0).unwrap().expect("puzzle");
        assert_eq!(puzzle.guaranteed_answer, "Alpha One");
        assert_eq!(puzzle.all_answers, BTreeSet::from(["Alpha One".to_string(), "Zed Zulu".to_string()]));
        let clues: BTreeSet<&str> = puzzle.clues.iter().map(|s| s.as_str()).collect();
        assert_eq!(clues, BTreeSet::from(["Bravo Two", "Charlie Three", "Delta Four"]));
    }

    #[test]
    fn test_differently_spelled_candidate_uses_answer_spelling() {
        let source = MockSource::new()
            .with_player("Jusuf Nurkic", "nurkiju01", &[("Bravo Two", 10), ("Charlie Three", 10), ("Delta Four", 10)])
            .with_player("Bravo Two", "bravo01", &[("Jusuf Nurkić", 10)])
            .with_player("Charlie Three", "charl01", &[("Jusuf Nurkić", 10)])
            .with_player("Delta Four", "delta01", &[("Jusuf Nurkić", 10)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Jusuf Nurkic"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = engine.generate_puzzle_with_rng(&mut rng, 1, 0).unwrap().expect("puzzle");
        assert_eq!(puzzle.guaranteed_answer, "Jusuf Nurkić");
        assert_eq!(puzzle.all_answers.len(), 1);
    }

    #[test]
    fn test_unresolvable_candidate_uses_one_trial_each() {
        let source = MockSource::new();
        let engine = Engine::new(&source, MockDirectory(names(&["Ghost Player"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(engine.generate_puzzle_with_rng(&mut rng, 4, 0).unwrap(), None);
        assert_eq!(source.search_calls(), 4);
    }

    #[test]
    fn test_provider_failure_abandons_trial_only() {
        let source = MockSource::new().failing_search("Flaky Player");
        let engine = Engine::new(&source, MockDirectory(names(&["Flaky Player"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(engine.generate_puzzle_with_rng(&mut rng, 3, 0).unwrap(), None);
        assert_eq!(source.search_calls(), 3);
    }

    #[test]
    fn test_unresolvable_clue_abandons_trial() {
        let source = MockSource::new()
            .with_player("Alpha One", "alpha01", &[("Bravo Two", 10), ("Charlie Three", 10), ("Nobody Known", 10)])
            .with_player("Bravo Two", "bravo01", &[("Alpha One", 10)])
            .with_player("Charlie Three", "charl01", &[("Alpha One", 10)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(9);
        let err = PuzzleGenerator::default().run_trial(&engine, &names(&["Alpha One"]), &mut rng, 0).unwrap_err();
        assert_eq!(err, Abandoned::ClueNotFound("Nobody Known".to_string()));
    }

    #[test]
    fn test_unresolvable_clue_costs_no_clue_roster_fetch() {
        let source = MockSource::new()
            .with_player("Alpha One", "alpha01", &[("Bravo Two", 10), ("Charlie Three", 10), ("Nobody Known", 10)])
            .with_player("Bravo Two", "bravo01", &[("Alpha One", 10)])
            .with_player("Charlie Three", "charl01", &[("Alpha One", 10)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(PuzzleGenerator::default().run_trial(&engine, &names(&["Alpha One"]), &mut rng, 0).is_err());
        }
        // Only the candidate's own table was ever fetched
        assert_eq!(source.table_calls(), 1);
    }

    #[test]
    fn test_two_clues_resolving_to_one_player_abandons_trial() {
        // "Gary Payton" searches to a listing led by his son, who is also a teammate
        let source = MockSource::new()
            .with_player("Alpha One", "alpha01", &[("Gary Payton", 10), ("Gary Payton II", 10), ("Bravo Two", 10)])
            .with_listing("Gary Payton", &[("Gary Payton II", "paytoga02"), ("Gary Payton", "paytoga01")])
            .with_player("Gary Payton II", "paytoga02", &[("Alpha One", 10)])
            .with_player("Bravo Two", "bravo01", &[("Alpha One", 10)]);
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let err = PuzzleGenerator::default().run_trial(&engine, &names(&["Alpha One"]), &mut rng, 0).unwrap_err();
            assert_eq!(err, Abandoned::DuplicateClue("Gary Payton II".to_string()), "seed {}", seed);
        }
        assert_eq!(source.table_calls(), 1);
    }

    #[test]
    fn test_clue_with_empty_roster_abandons_trial() {
        let source = MockSource::new()
            .with_player("Alpha One", "alpha01", &[("Bravo Two", 10), ("Charlie Three", 10), ("Delta Four", 10)])
            .with_player("Bravo Two", "bravo01", &[("Alpha One", 10)])
            .with_player("Charlie Three", "charl01", &[("Alpha One", 10)])
            .with_player("Delta Four", "delta01", &[]);
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(engine.generate_puzzle_with_rng(&mut rng, 2, 0).unwrap(), None);
    }

    #[test]
    fn test_games_threshold_applies_to_every_roster() {
        // With a 50-game threshold Alpha keeps only two teammates
        let source = MockSource::new().with_player(
            "Alpha One",
            "alpha01",
            &[("Bravo Two", 80), ("Charlie Three", 60), ("Delta Four", 50)],
        );
        let engine = Engine::new(&source, MockDirectory(names(&["Alpha One"])), &EngineConfig::default());

        let mut rng = StdRng::seed_from_u64(4);
        let err = PuzzleGenerator::default().run_trial(&engine, &names(&["Alpha One"]), &mut rng, 50).unwrap_err();
        assert_eq!(err, Abandoned::ThinRoster { candidate: "Alpha One".to_string(), distinct: 2 });
    }

    #[test]
    fn test_empty_directory_abandons() {
        let source = MockSource::new();
        let engine = Engine::new(&source, MockDirectory(vec![]), &EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(0);
        let err = PuzzleGenerator::default().run_trial(&engine, &[], &mut rng, 0).unwrap_err();
        assert_eq!(err, Abandoned::EmptyDirectory);
    }
}
