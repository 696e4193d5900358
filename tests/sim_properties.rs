use echo_trail::config::SimConfig;
use echo_trail::persistence::{load_from_str, save_to_string};
use echo_trail::sim::{Direction, GamePhase, GameState, TickInput, TickOutcome, tick};
use proptest::prelude::*;

fn input_for(code: u8) -> TickInput {
    match code {
        0 => TickInput::moving(Direction::Up),
        1 => TickInput::moving(Direction::Down),
        2 => TickInput::moving(Direction::Left),
        3 => TickInput::moving(Direction::Right),
        4 => TickInput {
            direction: Direction::Up,
            hold: true,
        },
        _ => TickInput::default(),
    }
}

/// Short delays so echoes pile up within a few hundred ticks
fn busy_config() -> SimConfig {
    SimConfig {
        echo_delay: 6,
        echo_limit: 3,
        speed_step: 40,
        ..SimConfig::default()
    }
}

fn playing(config: SimConfig, seed: u64) -> GameState {
    let mut state = GameState::new(config, seed);
    state.phase = GamePhase::Playing;
    state.drain_events();
    state
}

fn script() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 1..400)
}

proptest! {
    #[test]
    fn invariants_hold_every_tick(seed in any::<u64>(), codes in script()) {
        let config = busy_config();
        let mut state = playing(config.clone(), seed);
        let mut last_peak = 0;

        for code in codes {
            let outcome = tick(&mut state, &input_for(code));
            let score = &state.score;
            prop_assert!(score.multiplier >= 1.0 && score.multiplier <= 4.0);
            prop_assert!(state.echoes.len() <= config.echo_limit);
            prop_assert!(state.echoes.iter().all(|e| e.path().len() == config.echo_delay));
            prop_assert!(score.echo_peak >= last_peak);
            prop_assert!(score.echo_peak >= state.echoes.len());
            last_peak = score.echo_peak;
            prop_assert!(state.tick_rate <= config.max_tick_rate);
            prop_assert!(state.kinetic_count() <= config.max_kinetic);
            prop_assert!(state.orbs.len() <= config.ball_cap);
            prop_assert!(state.grid.in_bounds(state.player.pos));
            if outcome != TickOutcome::Advanced {
                prop_assert_eq!(state.phase, GamePhase::Over);
                break;
            }
        }
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), codes in script()) {
        let mut a = playing(busy_config(), seed);
        let mut b = playing(busy_config(), seed);
        for code in codes {
            prop_assert_eq!(tick(&mut a, &input_for(code)), tick(&mut b, &input_for(code)));
            prop_assert_eq!(a.drain_events(), b.drain_events());
        }
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.rng_state, b.rng_state);
    }

    #[test]
    fn restore_continues_identically(
        seed in any::<u64>(),
        codes in script(),
        split in 0usize..400,
    ) {
        let split = split % codes.len();
        let mut original = playing(busy_config(), seed);
        for code in &codes[..split] {
            tick(&mut original, &input_for(*code));
        }
        original.drain_events();

        let json = save_to_string(&original).unwrap();
        let mut restored = load_from_str(&json).unwrap();

        for code in &codes[split..] {
            let input = input_for(*code);
            prop_assert_eq!(tick(&mut original, &input), tick(&mut restored, &input));
            prop_assert_eq!(original.drain_events(), restored.drain_events());
        }
        prop_assert_eq!(&original.player, &restored.player);
        prop_assert_eq!(&original.echoes, &restored.echoes);
        prop_assert_eq!(&original.obstacles, &restored.obstacles);
        prop_assert_eq!(&original.orbs, &restored.orbs);
        prop_assert_eq!(original.tick, restored.tick);
    }
}
