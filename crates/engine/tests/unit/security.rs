//! Keystream Generator Unit Tests.
//!
//! The generation contract: pure function of (key seed, counter),
//! deterministic across instances, masked to 53 bits.

use thoth_core::config::GeneratorConfig;
use thoth_core::security::{KeystreamGenerator, PARTIAL_VALUE_MASK, PartialGenerator};

fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        start_counter: 0,
        key_seed: 0x5EED,
        latency: 20,
        counter_latency: 1,
    }
}

#[test]
fn equal_counters_yield_equal_partials() {
    let generator = KeystreamGenerator::new(&test_config());
    assert_eq!(generator.generate(42), generator.generate(42));
}

#[test]
fn two_instances_agree() {
    let a = KeystreamGenerator::new(&test_config());
    let b = KeystreamGenerator::new(&test_config());
    for counter in 0..64 {
        assert_eq!(a.generate(counter), b.generate(counter));
    }
}

#[test]
fn adjacent_counters_diverge() {
    let generator = KeystreamGenerator::new(&test_config());
    assert_ne!(generator.generate(0), generator.generate(1));
    assert_ne!(generator.generate(1), generator.generate(2));
}

#[test]
fn different_seeds_diverge() {
    let a = KeystreamGenerator::new(&test_config());
    let mut other = test_config();
    other.key_seed = 0x5EEE;
    let b = KeystreamGenerator::new(&other);
    assert_ne!(a.generate(7), b.generate(7));
}

#[test]
fn output_fits_53_bits() {
    let generator = KeystreamGenerator::new(&test_config());
    for counter in 0..256 {
        assert!(generator.generate(counter) <= PARTIAL_VALUE_MASK);
    }
}

#[test]
fn next_partial_walks_the_counter() {
    let mut generator = KeystreamGenerator::new(&GeneratorConfig {
        start_counter: 5,
        ..test_config()
    });
    assert_eq!(generator.counter(), 5);

    let expected = generator.generate(5);
    assert_eq!(generator.next_partial(), expected);
    assert_eq!(generator.counter(), 6);
}

#[test]
fn pace_sums_both_latencies() {
    let generator = KeystreamGenerator::new(&test_config());
    assert_eq!(generator.pace(), 21);
}
