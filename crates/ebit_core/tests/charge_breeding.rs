use ebit_core::rates::TabulatedCrossSections;
use ebit_core::{ChargeBreeder, EbitParams, RkStepParams, Sample, SimulationConfig, SpeciesConfig};

const TRACKED: [usize; 7] = [0, 1, 2, 3, 4, 5, 6];

fn ionization_tables() -> TabulatedCrossSections {
    TabulatedCrossSections::new()
        .with_table(2, vec![2.0e-18, 1.0e-18, 0.0])
        .with_table(6, vec![3.0e-18, 2.5e-18, 2.0e-18, 1.5e-18, 1.0e-18, 0.5e-18, 0.0])
}

fn no_recombination() -> TabulatedCrossSections {
    TabulatedCrossSections::new()
        .with_table(2, vec![0.0; 3])
        .with_table(6, vec![0.0; 7])
}

fn two_species_config() -> SimulationConfig {
    SimulationConfig {
        species: vec![
            SpeciesConfig::new(2, 4).with_charge_states(TRACKED.to_vec()),
            SpeciesConfig::new(6, 12).with_charge_states(TRACKED.to_vec()),
        ],
        params: EbitParams {
            breeding_time: 0.01,
            probe_every: 0.001,
            pressure: 0.0,
            rk: RkStepParams {
                time_step: 1e-6,
                ..RkStepParams::default()
            },
            ..EbitParams::default()
        },
        ionization: ionization_tables(),
        radiative_recombination: no_recombination(),
    }
}

fn totals(species: &ebit_core::Species) -> Vec<f64> {
    let count = species.results[0].samples.len();
    (0..count)
        .map(|i| {
            species
                .results
                .iter()
                .map(|trace| trace.samples[i].population)
                .sum()
        })
        .collect()
}

/// Population at charge `q` or above, per sample.
fn at_or_above(species: &ebit_core::Species, q: usize) -> Vec<f64> {
    let count = species.results[0].samples.len();
    (0..count)
        .map(|i| {
            species
                .results
                .iter()
                .filter(|trace| trace.charge_state >= q)
                .map(|trace| trace.samples[i].population)
                .sum()
        })
        .collect()
}

#[test]
fn two_stable_species_breed_upwards_and_conserve_ions() {
    let mut breeder = ChargeBreeder::from_config(two_species_config());
    let stats = breeder.run().expect("simulation should succeed");

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].z, 6);
    assert_eq!(stats[1].z, 2);
    for entry in &stats {
        // the last threshold accumulates to slightly above the breeding time
        assert!((10..=11).contains(&entry.samples));
        assert!(entry.accepted_steps > 0);
    }

    for species in breeder.species() {
        let z = species.z as usize;

        let neutral = species.trace(0).expect("charge state 0 is tracked");
        assert!(neutral.samples.iter().all(|s| s.population == 0.0));

        let above = species.trace(6).expect("charge state 6 is tracked");
        if z < 6 {
            assert!(above.samples.iter().all(|s| s.population == 0.0));
        }
        assert!(species.population[z + 1..].iter().all(|&n| n == 0.0));

        let top = species.trace(z).expect("fully stripped state is tracked");
        for pair in top.samples.windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert!(pair[1].population >= pair[0].population - 1e-12);
        }
        assert!(top.samples.last().map(|s| s.population).unwrap_or(0.0) > 0.0);

        // without recombination or charge exchange ions only move upwards
        for &q in TRACKED.iter().filter(|&&q| q >= 1) {
            for pair in at_or_above(species, q).windows(2) {
                assert!(
                    pair[1] >= pair[0] - 1e-12,
                    "Z={z}: population at charge >= {q} fell from {} to {}",
                    pair[0],
                    pair[1]
                );
            }
        }

        assert!((species.total_population() - 1.0).abs() < 1e-9);
    }

    let helium = &breeder.species()[1];
    for total in totals(helium) {
        assert!((total - 1.0).abs() < 1e-9, "helium total drifted to {total}");
    }
}

#[test]
fn repeated_runs_after_reset_are_bit_identical() {
    let mut breeder = ChargeBreeder::from_config(two_species_config());
    breeder.run().expect("first run should succeed");
    let first: Vec<Vec<Sample>> = breeder
        .species()
        .iter()
        .flat_map(|s| s.results.iter().map(|t| t.samples.clone()))
        .collect();

    breeder.reset();
    breeder.run().expect("second run should succeed");
    let second: Vec<Vec<Sample>> = breeder
        .species()
        .iter()
        .flat_map(|s| s.results.iter().map(|t| t.samples.clone()))
        .collect();

    assert_eq!(first, second);

    let mut fresh = ChargeBreeder::from_config(two_species_config());
    fresh.run().expect("fresh run should succeed");
    let third: Vec<Vec<Sample>> = fresh
        .species()
        .iter()
        .flat_map(|s| s.results.iter().map(|t| t.samples.clone()))
        .collect();
    assert_eq!(first, third);
}

#[test]
fn zero_rates_keep_population_constant() {
    let config = SimulationConfig {
        species: vec![SpeciesConfig::new(3, 7)
            .with_initial_population(2.5)
            .with_charge_states(vec![1, 2])],
        params: EbitParams {
            breeding_time: 0.05,
            probe_every: 0.01,
            pressure: 0.0,
            ..EbitParams::default()
        },
        ionization: TabulatedCrossSections::new().with_table(3, vec![0.0; 4]),
        radiative_recombination: TabulatedCrossSections::new().with_table(3, vec![0.0; 4]),
    };
    let mut breeder = ChargeBreeder::from_config(config);
    let stats = breeder.run().expect("simulation should succeed");

    assert_eq!(stats[0].rejected_steps, 0);
    let trace = breeder.trace(3, 1).expect("charge state 1 is tracked");
    assert!(trace.samples.len() >= 5);
    assert!(trace.samples.iter().all(|s| s.population == 2.5));
    let empty = breeder.trace(3, 2).expect("charge state 2 is tracked");
    assert!(empty.samples.iter().all(|s| s.population == 0.0));
}

#[test]
fn beta_decay_follows_list_adjacency() {
    let half_life = 0.5;
    let lambda = std::f64::consts::LN_2 / half_life;
    let zero = |_: f64, z: u32| vec![0.0; z as usize + 1];
    let mut breeder = ChargeBreeder::new(
        vec![
            SpeciesConfig::new(2, 6)
                .with_half_life(half_life)
                .with_charge_states(vec![1]),
            SpeciesConfig::new(3, 6).with_charge_states(vec![1]),
        ],
        EbitParams {
            breeding_time: 1.0,
            probe_every: 0.125,
            pressure: 0.0,
            rk: RkStepParams {
                time_step: 1e-3,
                ..RkStepParams::default()
            },
            ..EbitParams::default()
        },
        zero,
        zero,
    );

    breeder.run().expect("first run should succeed");

    // An accepted step adopts two half steps of size h but advances time by h, so every
    // rate acts at twice its nominal value on the sampled time axis.
    let effective = 2.0 * lambda;

    // The daughter list entry decays on its own.
    let parent = breeder.trace(2, 1).expect("Z = 2 tracks charge state 1");
    assert!(parent.samples.len() >= 8);
    for sample in &parent.samples {
        let expected = (-effective * sample.time).exp();
        assert!((sample.population - expected).abs() < 1e-5);
    }

    // The Z = 3 entry was integrated first, while its neighbour's trial buffer was empty.
    let top = breeder.trace(3, 1).expect("Z = 3 tracks charge state 1");
    assert!(top.samples.iter().all(|s| s.population == 1.0));
    let first_run_samples = top.samples.len();

    // A second pass without reset sees the neighbour's last trial population at the same
    // charge state and gains from it at the neighbour's decay rate.
    let feed = breeder.species()[1].rk4.tmp[1];
    assert!(feed > 0.0 && feed < 0.6);
    breeder.run().expect("second run should succeed");

    let top = breeder.trace(3, 1).expect("Z = 3 tracks charge state 1");
    assert!(top.samples.len() > first_run_samples);
    for sample in &top.samples[first_run_samples..] {
        let expected = 1.0 + effective * feed * sample.time;
        assert!(
            (sample.population - expected).abs() < 1e-9,
            "t = {}: got {}, expected {}",
            sample.time,
            sample.population,
            expected
        );
    }
    assert_eq!(breeder.species()[0].population[0], 0.0);
    assert_eq!(breeder.species()[0].population[2], 0.0);
}
