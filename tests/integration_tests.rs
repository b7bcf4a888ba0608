// 統合テスト

use nazori::application::{ResolveRequest, SimulationService, SolveRequest, SolveService};
use nazori::domain::board::{presets, Board, PuyoAttr, PuyoCoord, PuyoType};
use nazori::domain::chain::aggregate;
use nazori::domain::search::{
    count_up, solve_all_traces, ExplorationCategory, ExplorationTarget, PreferenceKind,
};
use nazori::domain::simulation::Simulator;
use nazori::infrastructure::executor::ParallelConfig;
use nazori::infrastructure::storage::{MemoryResultWriter, ResultWriter};

fn coords(xy: &[(i32, i32)]) -> Vec<PuyoCoord> {
    xy.iter().map(|(x, y)| PuyoCoord::from_xy(*x, *y).unwrap()).collect()
}

fn rule1_1() -> Board {
    presets::preset("specialRule1/1")
        .unwrap()
        .unwrap()
        .with_next_all(PuyoType::Green)
}

fn rule2_1() -> Board {
    presets::preset("specialRule2/1")
        .unwrap()
        .unwrap()
        .with_next_all(PuyoType::Blue)
}

/// ドメイン層の統合テスト
mod domain_integration {
    use super::*;

    #[test]
    fn board_json_roundtrip_keeps_simulation_result() {
        let board = rule1_1();
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);

        let trace = coords(&[(5, 2), (6, 2)]);
        let a = Simulator::from_board(&board).unwrap().resolve(&trace).unwrap();
        let b = Simulator::from_board(&restored).unwrap().resolve(&trace).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rule1_1_resolve_totals() {
        let chains = Simulator::from_board(&rule1_1())
            .unwrap()
            .resolve(&coords(&[(5, 2), (6, 2)]))
            .unwrap();
        assert_eq!(chains.len(), 14);
        let green = aggregate::total_damage_of_attr(&chains, PuyoAttr::Green);
        assert!((green - 109.0).abs() < 1e-6);
    }

    #[test]
    fn rule2_1_recolor_resolve() {
        let chains = Simulator::from_board(&rule2_1())
            .unwrap()
            .resolve(&coords(&[(3, 0), (5, 0), (4, 1), (4, 2), (3, 3)]))
            .unwrap();
        assert_eq!(chains.len(), 10);
        let blue = chains[0].attr(PuyoAttr::Blue).unwrap();
        assert_eq!(blue.popped_num, 6);
        assert!((blue.strength - 1.3).abs() < 1e-6);
    }

    #[test]
    fn rule2_1_blue_search_examines_all_candidates() {
        let sim = Simulator::from_board(&rule2_1()).unwrap();
        let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Blue));
        let result = solve_all_traces(&sim, &target).unwrap();
        assert_eq!(result.candidates_num, 15359);
        assert!(result.best().is_some());
    }

    #[test]
    fn candidate_counts() {
        let counts: Vec<u64> = (0..=5).map(|n| count_up(n).unwrap()).collect();
        assert_eq!(counts, vec![0, 48, 200, 804, 3435, 15359]);
    }

    #[test]
    fn chance_mode_caps_trace_length() {
        let mut board = rule1_1();
        board.max_trace_num = 7;
        board.is_chance_mode = true;
        let sim = Simulator::from_board(&board).unwrap();
        assert_eq!(sim.actual_max_trace_num(), 5);
        let result = solve_all_traces(&sim, &ExplorationTarget::default()).unwrap();
        assert_eq!(result.candidates_num, 15359);
    }
}

/// アプリケーション層の統合テスト
mod application_integration {
    use super::*;

    fn green_request() -> SolveRequest {
        SolveRequest::new(
            rule1_1(),
            ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green)),
        )
    }

    #[test]
    fn serial_solve_finds_regression_trace() {
        let result = SolveService::new().solve(&green_request()).unwrap();
        assert_eq!(result.candidates_num, 15359);
        let best = result.best().unwrap();
        assert_eq!(best.trace_coords, coords(&[(5, 2), (6, 2)]));
        assert!((best.value - 109.0).abs() < 1e-6);
    }

    #[test]
    fn parallel_solve_matches_serial() {
        let request = SolveRequest {
            target: green_request()
                .target
                .with_optimal_solution_count(10)
                .unwrap(),
            ..green_request()
        };
        let serial = SolveService::new().solve(&request).unwrap();
        let parallel = SolveService::new()
            .with_parallel(ParallelConfig::new(4))
            .solve(&request)
            .unwrap();

        assert_eq!(serial.candidates_num, parallel.candidates_num);
        assert_eq!(serial.optimal_solutions, parallel.optimal_solutions);
    }

    #[test]
    fn preference_priorities_change_ranking() {
        let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green))
            .with_preference_priorities(vec![PreferenceKind::BiggerTraceNum, PreferenceKind::BiggerValue]);
        let result = SolveService::new()
            .solve(&SolveRequest::new(rule1_1(), target))
            .unwrap();
        assert_eq!(result.best().unwrap().trace_num(), 5);
    }

    #[test]
    fn resolve_service_matches_search_result() {
        let solved = SolveService::new().solve(&green_request()).unwrap();
        let best = solved.best().unwrap();

        let request = ResolveRequest::new(rule1_1(), best.trace_coords.clone());
        let resolved = SimulationService::new().resolve(&request).unwrap();
        assert_eq!(resolved.chains, best.chains);
    }

    #[test]
    fn tsukai_target_uses_tsukai_count_as_value() {
        let target = ExplorationTarget::new(ExplorationCategory::PuyoTsukaiCount);
        let result = SolveService::new()
            .solve(&SolveRequest::new(rule1_1(), target).with_root(21))
            .unwrap();
        let best = result.best().unwrap();
        assert_eq!(best.value, best.puyo_tsukai_count as f64);
    }
}

/// インフラ層の統合テスト
mod infrastructure_integration {
    use super::*;

    #[test]
    fn writer_receives_optimal_solutions() {
        let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green))
            .with_optimal_solution_count(3)
            .unwrap();
        let result = SolveService::new()
            .solve(&SolveRequest::new(rule1_1(), target))
            .unwrap();

        let mut writer = MemoryResultWriter::new();
        writer.write_batch(&result.optimal_solutions).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.count(), 3);
        assert_eq!(writer.results()[0], result.optimal_solutions[0]);
    }
}
