//! Demo request generators.
//!
//! `Small` matches the defaults of an interactive rostering form: eight
//! workers, five shifts each, two workers per shift. `Large` is a busier
//! site. Both scatter a few unavailable slots per worker from a seeded RNG,
//! so a given seed always yields the same request.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ScheduleRequest, ShiftCatalog};

/// Built-in demo sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

/// Unknown demo name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown demo data set '{0}', expected SMALL or LARGE")]
pub struct ParseDemoDataError(pub String);

impl FromStr for DemoData {
    type Err = ParseDemoDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(ParseDemoDataError(s.to_string())),
        }
    }
}

impl fmt::Display for DemoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                worker_count: 8,
                capacity: 5,
                morning_need: 2,
                evening_need: 2,
                unavailable_count_distribution: vec![(0, 4.0), (1, 3.0), (2, 2.0), (3, 1.0)],
            },
            DemoData::Large => DemoDataParameters {
                worker_count: 20,
                capacity: 7,
                morning_need: 4,
                evening_need: 3,
                unavailable_count_distribution: vec![(0, 2.0), (2, 3.0), (4, 2.0), (6, 1.0)],
            },
        }
    }
}

struct DemoDataParameters {
    worker_count: usize,
    capacity: u32,
    morning_need: u32,
    evening_need: u32,
    unavailable_count_distribution: Vec<(usize, f64)>,
}

/// Names of the available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec![DemoData::Small.as_str(), DemoData::Large.as_str()]
}

/// Generates a demo request with the default seed.
pub fn generate(demo: DemoData) -> ScheduleRequest {
    generate_with_seed(demo, 0)
}

/// Generates a demo request from a specific seed.
pub fn generate_with_seed(demo: DemoData, seed: u64) -> ScheduleRequest {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut request = ScheduleRequest::roster(params.worker_count)
        .with_default_capacity(params.capacity)
        .with_uniform_need(params.morning_need, params.evening_need);

    let slots = ShiftCatalog::slots();
    for worker in request.workers.clone() {
        let count = pick_count(&mut rng, &params.unavailable_count_distribution);
        for index in rand::seq::index::sample(&mut rng, slots.len(), count.min(slots.len())) {
            request.availability.set_unavailable(worker.clone(), slots[index]);
        }
    }
    request
}

fn pick_count(rng: &mut StdRng, distribution: &[(usize, f64)]) -> usize {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.random::<f64>() * total_weight;

    for (count, weight) in distribution {
        if choice < *weight {
            return *count;
        }
        choice -= weight;
    }
    distribution.last().map(|(c, _)| *c).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SLOT_COUNT;
    use crate::validation::validate_request;

    #[test]
    fn test_parse_demo_names() {
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("huge".parse::<DemoData>().is_err());
        assert_eq!(list_demo_data(), vec!["SMALL", "LARGE"]);
        assert_eq!(DemoData::Large.to_string(), "LARGE");
    }

    #[test]
    fn test_small_matches_form_defaults() {
        let r = generate(DemoData::Small);
        assert_eq!(r.workers.len(), 8);
        assert!(r.workers.iter().all(|w| r.capacity_of(w) == 5));
        assert_eq!(r.total_need(), 2 * SLOT_COUNT as u64);
        assert!(validate_request(&r).is_ok());
    }

    #[test]
    fn test_large_shape() {
        let r = generate(DemoData::Large);
        assert_eq!(r.workers.len(), 20);
        assert_eq!(r.total_need(), 7 * 4 + 7 * 3);
        assert!(validate_request(&r).is_ok());
        assert!(r.availability.unavailable_count() <= 20 * 6);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        assert_eq!(
            generate_with_seed(DemoData::Large, 42),
            generate_with_seed(DemoData::Large, 42)
        );
    }

    #[test]
    fn test_demo_sets_solve_to_optimality() {
        for demo in [DemoData::Small, DemoData::Large] {
            let request = generate(demo);
            let sol = crate::solve_schedule(&request, &crate::SolverConfig::default())
                .unwrap()
                .unwrap();
            assert!(sol.is_optimal(), "{demo} not optimal");
            assert!(sol.fairness <= request.capacity_of("E1"));
        }
    }

    #[test]
    fn test_pick_count_respects_support() {
        let mut rng = StdRng::seed_from_u64(1);
        let dist = [(1, 1.0), (5, 1.0)];
        for _ in 0..50 {
            let c = pick_count(&mut rng, &dist);
            assert!(c == 1 || c == 5);
        }
    }
}
