use std::cell::Cell;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::drill::{
    CandidateLink, DrillConfig, DrillEngine, DrillError, HopSampler, RandomSampler, ScriptedSampler,
};

/// Candidate with a fixed queue length that counts how often its length was read.
struct FixedQueue {
    len: usize,
    reads: Cell<u32>,
}

impl FixedQueue {
    fn new(len: usize) -> Self {
        Self {
            len,
            reads: Cell::new(0),
        }
    }
}

impl CandidateLink for FixedQueue {
    fn queue_len(&self) -> usize {
        self.reads.set(self.reads.get() + 1);
        self.len
    }

    fn queue_capacity(&self) -> usize {
        50
    }
}

fn queues(lens: &[usize]) -> Vec<FixedQueue> {
    lens.iter().copied().map(FixedQueue::new).collect()
}

fn scripted(d: usize, script: &[usize]) -> DrillEngine<ScriptedSampler> {
    DrillEngine::new(DrillConfig::new(d, 1), ScriptedSampler::new(script.to_vec()))
        .expect("valid config")
}

#[test]
fn shortest_sampled_queue_wins_without_memory() {
    let mut engine = scripted(2, &[0, 2]);
    let cands = queues(&[5, 3, 7]);

    assert!(engine.memory().is_empty());
    assert_eq!(engine.select_next_hop(&cands), Ok(0));
    assert_eq!(engine.memory(), &[0]);
    // Index 1 has the globally shortest queue but was never sampled.
    assert_eq!(cands[1].reads.get(), 0);
}

#[test]
fn equal_queues_keep_the_first_seen_sample_over_memory() {
    let mut engine = scripted(2, &[1, 1]);
    engine.set_memory(&[2]);
    let cands = queues(&[5, 3, 7]);

    assert_eq!(engine.select_next_hop(&cands), Ok(1));
    assert_eq!(engine.memory(), &[1]);
    assert_eq!(cands[1].reads.get(), 2);
    assert_eq!(cands[2].reads.get(), 1);
}

#[test]
fn tie_between_sample_and_memory_prefers_the_sample() {
    let mut engine = scripted(1, &[0]);
    engine.set_memory(&[2]);
    let cands = queues(&[4, 9, 4]);

    assert_eq!(engine.select_next_hop(&cands), Ok(0));
    assert_eq!(engine.memory(), &[0]);
}

#[test]
fn empty_candidate_list_fails_and_leaves_memory_alone() {
    let mut engine = scripted(2, &[2, 2]);
    let cands = queues(&[5, 3, 7]);
    assert_eq!(engine.select_next_hop(&cands), Ok(2));
    assert_eq!(engine.memory(), &[2]);

    let none: Vec<FixedQueue> = Vec::new();
    assert_eq!(engine.select_next_hop(&none), Err(DrillError::NoCandidates));
    assert_eq!(engine.memory(), &[2]);
}

#[test]
fn empty_candidate_list_does_not_consume_randomness() {
    let mut engine = scripted(2, &[0, 1, 2, 3]);
    let none: Vec<FixedQueue> = Vec::new();
    assert!(engine.select_next_hop(&none).is_err());

    let cands = queues(&[1, 0, 1, 1]);
    // First two scripted draws are still 0 and 1.
    assert_eq!(engine.select_next_hop(&cands), Ok(1));
}

#[test]
fn memory_out_of_range_after_shrink_is_skipped_for_one_round() {
    let mut engine = scripted(2, &[4, 4, 0, 1]);
    let wide = queues(&[9, 9, 9, 9, 0]);
    assert_eq!(engine.select_next_hop(&wide), Ok(4));
    assert_eq!(engine.memory(), &[4]);

    let narrow = queues(&[3, 1]);
    assert_eq!(engine.select_next_hop(&narrow), Ok(1));
    assert_eq!(engine.memory(), &[1]);
    assert_eq!(narrow[0].reads.get(), 1);
    assert_eq!(narrow[1].reads.get(), 1);
}

#[test]
fn memory_exactly_at_new_length_is_out_of_range() {
    let mut engine = scripted(1, &[0]);
    engine.set_memory(&[2]);
    let cands = queues(&[6, 1]);
    assert_eq!(engine.select_next_hop(&cands), Ok(0));
    assert_eq!(cands[1].reads.get(), 0);
}

#[test]
fn d_zero_selects_from_memory_only() {
    let mut engine = scripted(0, &[0]);
    engine.set_memory(&[1]);
    let cands = queues(&[9, 2, 4]);

    assert_eq!(engine.select_next_hop(&cands), Ok(1));
    assert_eq!(engine.memory(), &[1]);
    assert_eq!(cands[0].reads.get(), 0);
    assert_eq!(cands[2].reads.get(), 0);

    // Memory-only stays put even when another link is strictly better.
    let cands = queues(&[0, 30, 0]);
    assert_eq!(engine.select_next_hop(&cands), Ok(1));
}

#[test]
fn d_zero_without_usable_memory_falls_back_to_first_candidate() {
    let mut engine = scripted(0, &[]);
    let cands = queues(&[8, 1]);
    assert_eq!(engine.select_next_hop(&cands), Ok(0));
    assert_eq!(engine.memory(), &[0]);

    engine.set_memory(&[7]);
    assert_eq!(engine.select_next_hop(&cands), Ok(0));
}

#[test]
fn d_larger_than_candidate_count_samples_with_replacement() {
    let mut engine = scripted(5, &[1, 1, 1, 1, 1]);
    let cands = queues(&[0, 3]);
    assert_eq!(engine.select_next_hop(&cands), Ok(1));
    assert_eq!(cands[1].reads.get(), 5);
    assert_eq!(cands[0].reads.get(), 0);
}

#[test]
fn previous_choice_is_evaluated_on_the_next_decision() {
    let mut engine = DrillEngine::with_seed(DrillConfig::default(), 42).expect("valid config");
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..500 {
        let n = rng.gen_range(1..8);
        let lens: Vec<usize> = (0..n).map(|_| rng.gen_range(0..20)).collect();
        let cands = queues(&lens);
        let remembered = engine.memory().first().copied();

        let chosen = engine.select_next_hop(&cands).expect("non-empty");
        assert!(chosen < n);
        if let Some(h) = remembered.filter(|&h| h < n) {
            assert!(cands[h].reads.get() >= 1, "memory hop {h} not read");
            assert!(lens[chosen] <= lens[h]);
        }
        assert_eq!(engine.memory(), &[chosen]);
    }
}

#[test]
fn choice_is_first_minimum_of_samples_then_memory() {
    // Replays the same seeded sampler alongside the engine to know the draws.
    for seed in 0..50u64 {
        let mut engine = DrillEngine::with_seed(DrillConfig::new(3, 1), seed).expect("valid");
        let mut shadow = RandomSampler::from_seed(seed);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0xABCD);

        for _ in 0..40 {
            let n = rng.gen_range(1..6);
            let lens: Vec<usize> = (0..n).map(|_| rng.gen_range(0..4)).collect();
            let mut eval: Vec<usize> = (0..3).map(|_| shadow.sample(n)).collect();
            eval.extend(engine.memory().iter().copied().filter(|&h| h < n));

            let mut expected = eval[0];
            for &i in &eval {
                if lens[i] < lens[expected] {
                    expected = i;
                }
            }

            let cands = queues(&lens);
            assert_eq!(engine.select_next_hop(&cands), Ok(expected));
        }
    }
}

#[test]
fn identical_seeds_and_inputs_give_identical_choices() {
    let cfg = DrillConfig::default();
    let mut a = DrillEngine::with_seed(cfg, 99).expect("valid");
    let mut b = DrillEngine::with_seed(cfg, 99).expect("valid");
    let cands = queues(&[2, 2, 2, 2, 2, 2, 2, 2]);

    let picks_a: Vec<usize> = (0..100).map(|_| a.select_next_hop(&cands).expect("ok")).collect();
    let picks_b: Vec<usize> = (0..100).map(|_| b.select_next_hop(&cands).expect("ok")).collect();
    assert_eq!(picks_a, picks_b);
    assert_eq!(a.memory(), b.memory());
}

#[test]
fn random_sampling_spreads_over_equal_queues() {
    let mut engine = DrillEngine::with_seed(DrillConfig::default(), 5).expect("valid");
    let cands = queues(&[0, 0, 0, 0]);
    let mut seen = [0u32; 4];
    for _ in 0..400 {
        seen[engine.select_next_hop(&cands).expect("ok")] += 1;
    }
    assert!(seen.iter().all(|&c| c > 0), "some candidate never chosen: {seen:?}");
}

#[test]
fn multi_slot_memory_keeps_recent_distinct_hops() {
    let mut engine =
        DrillEngine::new(DrillConfig::new(1, 2), ScriptedSampler::new(vec![0, 1, 2, 1]))
            .expect("valid");

    let lens = queues(&[0, 0, 0]);
    assert_eq!(engine.select_next_hop(&lens), Ok(0));
    assert_eq!(engine.memory(), &[0]);

    let lens = queues(&[5, 0, 5]);
    assert_eq!(engine.select_next_hop(&lens), Ok(1));
    assert_eq!(engine.memory(), &[1, 0]);

    // Sample 2 is worse than remembered hop 0.
    let lens = queues(&[1, 4, 3]);
    assert_eq!(engine.select_next_hop(&lens), Ok(0));
    assert_eq!(engine.memory(), &[0, 1]);

    let lens = queues(&[2, 1, 0]);
    assert_eq!(engine.select_next_hop(&lens), Ok(1));
    assert_eq!(engine.memory(), &[1, 0]);
    assert_eq!(lens[2].reads.get(), 0);
}

#[test]
fn config_validation_rejects_only_zero_memory() {
    assert!(DrillConfig::default().validate().is_ok());
    assert!(DrillConfig::new(0, 1).validate().is_ok());
    assert!(DrillConfig::new(usize::MAX, 1).validate().is_ok());

    assert!(matches!(
        DrillEngine::with_seed(DrillConfig::new(2, 0), 1),
        Err(DrillError::InvalidConfig(_))
    ));
}

#[test]
fn large_d_builds_and_finds_the_shortest_queue() {
    let mut engine = DrillEngine::with_seed(DrillConfig::new(2000, 1), 1).expect("d=2000 is valid");
    let cands = queues(&[9, 9, 0, 9]);
    // 2000 draws over 4 candidates all but surely hit index 2.
    assert_eq!(engine.select_next_hop(&cands), Ok(2));
    assert_eq!(engine.memory(), &[2]);
    let reads: u32 = cands.iter().map(|c| c.reads.get()).sum();
    assert_eq!(reads, 2000);

    let mut replay = engine.sibling(ScriptedSampler::new(vec![3]));
    assert_eq!(replay.config().d, 2000);
    assert_eq!(replay.select_next_hop(&queues(&[0, 0, 0, 5])), Ok(3));
}

#[test]
fn sibling_engines_share_config_but_not_memory() {
    let mut a = scripted(1, &[1]);
    let cands = queues(&[3, 0]);
    assert_eq!(a.select_next_hop(&cands), Ok(1));

    let b = a.sibling(ScriptedSampler::new(vec![0]));
    assert_eq!(b.config(), a.config());
    assert!(b.memory().is_empty());
    assert_eq!(a.memory(), &[1]);
}

#[test]
fn drill_config_deserializes_with_defaults() {
    let cfg: DrillConfig = serde_json::from_str("{}").expect("parse");
    assert_eq!(cfg, DrillConfig { d: 2, memory: 1 });
    let cfg: DrillConfig = serde_json::from_str(r#"{"d": 4}"#).expect("parse");
    assert_eq!(cfg, DrillConfig { d: 4, memory: 1 });
}
