use proptest::prelude::*;
use spread::{moore_neighbors, Board, Counters, EpidemicGrid, HealthState, Parameters};
use strum::IntoEnumIterator;

fn arb_parameters() -> impl Strategy<Value = Parameters> {
    (
        (0.0f64..=1.0, 0usize..8, 0.0f64..=1.0, 1u32..8),
        (0.0f64..=0.2, 1u32..10, 0.0f64..=1.0, 0u32..6),
        (0.2f64..=1.0, 0u32..6, proptest::option::of(0u32..20), 0.0f64..=1.0),
    )
        .prop_map(
            |(
                (immunity_rate, cluster_count, contagion_rate, contagion_delay),
                (mortality_rate, mortality_delay, quarantine_rate, diagnosis_delay),
                (
                    hospitalization_rate,
                    hospitalization_delay,
                    social_distancing_round,
                    social_distancing_contagion_rate,
                ),
            )| Parameters {
                immunity_rate,
                cluster_count,
                contagion_rate,
                contagion_delay,
                mortality_rate,
                mortality_delay,
                quarantine_rate,
                diagnosis_delay,
                hospitalization_rate,
                hospitalization_delay,
                social_distancing_round,
                social_distancing_contagion_rate,
            },
        )
}

/// Parameters where infected cells never change state and only spread.
fn spreading_only(contagion_rate: f64) -> Parameters {
    Parameters {
        immunity_rate: 0.3,
        cluster_count: 3,
        contagion_rate,
        contagion_delay: 1_000,
        mortality_rate: 0.0,
        mortality_delay: 1_000,
        quarantine_rate: 0.0,
        diagnosis_delay: 1_000,
        hospitalization_rate: 0.0,
        hospitalization_delay: 1_000,
        social_distancing_round: None,
        social_distancing_contagion_rate: 0.0,
    }
}

fn has_infected_neighbor(board: &Board, coord: spread::Coord) -> bool {
    moore_neighbors(coord, board.length(), board.width())
        .any(|n| board[n] == HealthState::Infected)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn population_is_conserved(
        length in 1usize..12,
        width in 1usize..12,
        parameters in arb_parameters(),
        seed in any::<u64>(),
        rounds in 0usize..25,
    ) {
        let mut grid = EpidemicGrid::with_parameters(length, width, parameters, seed).unwrap();
        grid.run(rounds).unwrap();

        prop_assert_eq!(grid.history().len(), rounds + 1);
        prop_assert_eq!(grid.current_round(), rounds);
        for (round, board) in grid.history().iter().enumerate() {
            let counts = grid.counts_at(round).unwrap();
            prop_assert_eq!(counts.total(), length * width);
            prop_assert_eq!(counts, Counters::recount(board));
            for state in HealthState::iter() {
                prop_assert_eq!(grid.series(state)[round], counts.get(state));
            }
        }
    }

    #[test]
    fn terminal_states_never_change(
        size in 2usize..10,
        parameters in arb_parameters(),
        seed in any::<u64>(),
    ) {
        let mut grid = EpidemicGrid::with_parameters(size, size, parameters, seed).unwrap();
        grid.run(20).unwrap();

        for pair in grid.history().windows(2) {
            for (coord, state) in pair[0].iter() {
                if state.is_terminal() {
                    prop_assert_eq!(pair[1][coord], *state);
                }
                // Nobody goes back to susceptible.
                if *state != HealthState::Susceptible {
                    prop_assert_ne!(pair[1][coord], HealthState::Susceptible);
                }
            }
        }
    }

    #[test]
    fn no_contagion_means_no_new_infections(
        size in 2usize..12,
        seed in any::<u64>(),
    ) {
        let mut grid = EpidemicGrid::with_parameters(size, size, spreading_only(0.0), seed).unwrap();
        let initial = grid.counts();
        grid.run(10).unwrap();
        prop_assert_eq!(grid.counts(), initial);
        for board in grid.history() {
            prop_assert_eq!(board, &grid.history()[0]);
        }
    }

    #[test]
    fn full_contagion_infects_every_exposed_neighbor(
        size in 2usize..12,
        seed in any::<u64>(),
    ) {
        let mut grid = EpidemicGrid::with_parameters(size, size, spreading_only(1.0), seed).unwrap();
        grid.run(6).unwrap();

        for pair in grid.history().windows(2) {
            for (coord, state) in pair[0].iter() {
                let expected = match state {
                    HealthState::Susceptible if has_infected_neighbor(&pair[0], coord) => {
                        HealthState::Infected
                    }
                    other => *other,
                };
                prop_assert_eq!(pair[1][coord], expected, "cell {}", coord);
            }
        }
    }

    #[test]
    fn same_seed_same_run(
        size in 1usize..10,
        parameters in arb_parameters(),
        seed in any::<u64>(),
    ) {
        let mut first = EpidemicGrid::with_parameters(size, size, parameters.clone(), seed).unwrap();
        let mut second = EpidemicGrid::with_parameters(size, size, parameters, seed).unwrap();
        first.run(12).unwrap();
        second.run(12).unwrap();
        prop_assert_eq!(first.history(), second.history());
        prop_assert_eq!(first.counters(), second.counters());
    }
}
