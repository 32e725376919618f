use rand::SeedableRng;
use rand::rngs::StdRng;
use township_core::{Population, Rules, SimConfig, World, WorldState, advance};

fn check_world(world: &World) {
    let state = &world.state;
    assert!(
        state.population.partners_consistent(),
        "day {}: partner references must be symmetric",
        world.day
    );
    assert!(
        (0.0..=100.0).contains(&state.satisfaction),
        "day {}: satisfaction {} out of range",
        world.day,
        state.satisfaction
    );
    assert!(state.food >= 0.0, "day {}: food {} negative", world.day, state.food);

    for couple in &state.couples {
        let a = &state.population[couple.0];
        let b = &state.population[couple.1];
        assert_eq!(a.partner, Some(couple.1));
        assert_eq!(b.partner, Some(couple.0));
    }
    for resident in state.population.residents() {
        assert!(resident.food_deficit >= 0.0);
        if resident.is_infected() {
            // Seeded infections start at 0 and progress on the first day
            assert!(world.day == 0 || resident.days_infected >= 1);
        } else {
            assert_eq!(resident.days_infected, 0);
            assert!(!resident.at_hospital);
        }
    }
}

#[test]
fn invariants_hold_every_day() {
    for seed in [1, 2, 3] {
        let mut world = World::new(SimConfig::default(), seed).unwrap();
        check_world(&world);
        for _ in 0..60 {
            world.run_day();
            check_world(&world);
        }
    }
}

#[test]
fn invariants_hold_under_heavy_outbreak() {
    let mut config = SimConfig::heavy_outbreak();
    config.bootstrap.food = 2_000.0;
    config.bootstrap.satisfaction = 80.0;
    let mut world = World::new(config, 17).unwrap();
    for _ in 0..40 {
        world.run_day();
        check_world(&world);
        if world.is_extinct() {
            break;
        }
    }
}

#[test]
fn population_bookkeeping_balances() {
    let mut world = World::new(SimConfig::default(), 23).unwrap();
    for _ in 0..30 {
        let before = world.state.population.len();
        let events = world.run_day();
        let (births, deaths) = (events.births.len(), events.deaths.len());
        assert_eq!(before + births - deaths, world.state.population.len());
    }
}

#[test]
fn empty_population_is_a_valid_state() {
    let rules = Rules::default();
    let mut rng = StdRng::seed_from_u64(0);
    let mut state = WorldState::new(Population::new(), 10.0, 35.0);

    for day in 1..=10 {
        let (next, events) = advance(state, day, 35.0, &rules, &mut rng);
        assert!(next.population.is_empty());
        assert!(next.couples.is_empty());
        assert!(events.deaths.is_empty());
        assert!(events.births.is_empty());
        assert!(events.visits.is_empty());
        assert!(events.status_changes.is_empty());
        assert_eq!(next.satisfaction, 35.0);
        assert_eq!(next.food, 10.0);
        state = next;
    }
}

#[test]
fn extreme_bootstrap_values_are_clamped() {
    let mut config = SimConfig::default();
    config.bootstrap.population = 5;
    config.bootstrap.food = -50.0;
    config.bootstrap.satisfaction = 250.0;
    let world = World::new(config, 4).unwrap();
    assert_eq!(world.state.food, 0.0);
    assert_eq!(world.state.satisfaction, 100.0);
}
