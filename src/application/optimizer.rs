//! Threshold Optimizer: offline genetic search for the perturbation rule.
//!
//! A batch procedure, not part of the request-serving path. Searches the
//! 7-dimensional threshold space to maximize mean k-fold cross-validated
//! accuracy of the perturbation rule against labeled training rows.
//! Deterministic for a fixed seed.
//!
//! The search is a plain generational GA: tournament selection, two-point
//! crossover, gaussian gene mutation, full replacement each generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::application::heuristic::HeuristicClassifier;
use crate::domain::{FeatureSet, Label, PerturbationThresholds, PERTURBATION_FEATURES};
use crate::{NeurovoiceError, Result};

/// One labeled training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRow {
    /// Perturbation measurements for one recording
    pub features: FeatureSet,
    /// Ground-truth label
    pub status: Label,
}

/// Search parameters. Defaults follow the original tuning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability of crossing each selected pair
    pub crossover_prob: f64,
    /// Probability of mutating each individual
    pub mutation_prob: f64,
    /// Per-gene mutation probability within a mutated individual
    pub gene_mutation_prob: f64,
    /// Standard deviation of the gaussian gene perturbation
    pub mutation_sigma: f64,
    pub tournament_size: usize,
    /// Cross-validation folds
    pub folds: usize,
    /// RNG seed; identical seeds reproduce identical results
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 200,
            crossover_prob: 0.8,
            mutation_prob: 0.4,
            gene_mutation_prob: 0.2,
            mutation_sigma: 1.0,
            tournament_size: 3,
            folds: 5,
            seed: 42,
        }
    }
}

/// Genome: the 7 thresholds in [`PerturbationThresholds`] field order.
type Genome = [f64; 7];

/// Offline tuner for the perturbation rule thresholds.
#[derive(Debug, Clone)]
pub struct ThresholdOptimizer {
    config: OptimizerConfig,
}

impl ThresholdOptimizer {
    /// Create an optimizer with the given search parameters.
    #[must_use]
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Run the search and return the best threshold table found.
    ///
    /// # Errors
    /// Returns `Validation` on unusable search parameters or an empty or
    /// too-small training set, and `MissingFeature`/`InvalidFeature` if
    /// any row lacks a perturbation measurement.
    pub fn optimize(&self, rows: &[TrainingRow]) -> Result<PerturbationThresholds> {
        let cfg = &self.config;
        if cfg.population_size < 2 {
            return Err(NeurovoiceError::Validation(
                "Population size must be at least 2".to_string(),
            ));
        }
        if cfg.tournament_size == 0 {
            return Err(NeurovoiceError::Validation(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if cfg.folds < 2 {
            return Err(NeurovoiceError::Validation(
                "Cross-validation needs at least 2 folds".to_string(),
            ));
        }
        if rows.len() < cfg.folds {
            return Err(NeurovoiceError::Validation(format!(
                "Need at least {} rows for {}-fold cross-validation, got {}",
                cfg.folds,
                cfg.folds,
                rows.len()
            )));
        }
        for (name, p) in [
            ("crossover_prob", cfg.crossover_prob),
            ("mutation_prob", cfg.mutation_prob),
            ("gene_mutation_prob", cfg.gene_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NeurovoiceError::Validation(format!(
                    "{name} must be a probability, got {p}"
                )));
            }
        }
        if !(cfg.mutation_sigma.is_finite() && cfg.mutation_sigma > 0.0) {
            return Err(NeurovoiceError::Validation(format!(
                "Mutation sigma must be positive, got {}",
                cfg.mutation_sigma
            )));
        }

        // Every row must carry the full perturbation vocabulary; surface
        // the offending feature now rather than deep inside a generation.
        for row in rows {
            for name in PERTURBATION_FEATURES {
                row.features.require(name)?;
            }
        }

        let mut rng = ChaCha20Rng::seed_from_u64(cfg.seed);
        let gauss = Normal::new(0.0, cfg.mutation_sigma)
            .map_err(|e| NeurovoiceError::Validation(format!("Invalid mutation sigma: {e}")))?;

        let mut population: Vec<Genome> = (0..cfg.population_size)
            .map(|_| std::array::from_fn(|_| rng.gen_range(0.0..1.0)))
            .collect();
        let mut fitness = self.evaluate_population(&population, rows)?;

        let mut best = population[0];
        let mut best_fitness = fitness[0];
        self.track_best(&population, &fitness, &mut best, &mut best_fitness);

        tracing::info!(
            "Starting threshold search: population={}, generations={}, seed={}",
            cfg.population_size,
            cfg.generations,
            cfg.seed
        );

        for generation in 0..cfg.generations {
            let mut offspring: Vec<Genome> = (0..cfg.population_size)
                .map(|_| self.tournament(&population, &fitness, &mut rng))
                .collect();

            for pair in offspring.chunks_mut(2) {
                if pair.len() == 2 && rng.gen_bool(cfg.crossover_prob) {
                    let (left, right) = pair.split_at_mut(1);
                    two_point_crossover(&mut left[0], &mut right[0], &mut rng);
                }
            }

            for genome in &mut offspring {
                if rng.gen_bool(cfg.mutation_prob) {
                    for gene in genome.iter_mut() {
                        if rng.gen_bool(cfg.gene_mutation_prob) {
                            *gene += gauss.sample(&mut rng);
                        }
                    }
                }
            }

            fitness = self.evaluate_population(&offspring, rows)?;
            population = offspring;
            self.track_best(&population, &fitness, &mut best, &mut best_fitness);

            if (generation + 1) % 20 == 0 {
                tracing::debug!(
                    "Generation {}: best cross-validated accuracy {:.4}",
                    generation + 1,
                    best_fitness
                );
            }
        }

        tracing::info!("Threshold search complete: accuracy {:.4}", best_fitness);
        Ok(PerturbationThresholds::from_array(best))
    }

    /// Mean k-fold cross-validated accuracy of a threshold table.
    ///
    /// The rule involves no fitting, so each fold simply scores the rule
    /// on its held-out rows. Folds are contiguous index ranges, which
    /// keeps the split deterministic.
    ///
    /// # Errors
    /// Returns an error if a row lacks a required feature.
    pub fn cross_validated_accuracy(
        &self,
        thresholds: &PerturbationThresholds,
        rows: &[TrainingRow],
    ) -> Result<f64> {
        let classifier = HeuristicClassifier::Perturbation(*thresholds);
        let folds = self.config.folds;
        let base = rows.len() / folds;
        let remainder = rows.len() % folds;

        let mut accuracies = Vec::with_capacity(folds);
        let mut start = 0;
        for fold in 0..folds {
            let size = base + usize::from(fold < remainder);
            let test = &rows[start..start + size];
            start += size;

            let mut correct = 0usize;
            for row in test {
                if classifier.evaluate(&row.features)? == row.status {
                    correct += 1;
                }
            }
            accuracies.push(correct as f64 / test.len() as f64);
        }
        Ok(accuracies.iter().sum::<f64>() / accuracies.len() as f64)
    }

    fn evaluate_population(&self, population: &[Genome], rows: &[TrainingRow]) -> Result<Vec<f64>> {
        population
            .iter()
            .map(|genome| {
                self.cross_validated_accuracy(&PerturbationThresholds::from_array(*genome), rows)
            })
            .collect()
    }

    fn tournament(&self, population: &[Genome], fitness: &[f64], rng: &mut ChaCha20Rng) -> Genome {
        let mut winner = rng.gen_range(0..population.len());
        for _ in 1..self.config.tournament_size {
            let challenger = rng.gen_range(0..population.len());
            if fitness[challenger] > fitness[winner] {
                winner = challenger;
            }
        }
        population[winner]
    }

    fn track_best(
        &self,
        population: &[Genome],
        fitness: &[f64],
        best: &mut Genome,
        best_fitness: &mut f64,
    ) {
        for (genome, &score) in population.iter().zip(fitness) {
            if score > *best_fitness {
                *best = *genome;
                *best_fitness = score;
            }
        }
    }
}

fn two_point_crossover(a: &mut Genome, b: &mut Genome, rng: &mut ChaCha20Rng) {
    // Picks two distinct cut points with the upper one allowed to sit past
    // the final gene, so every position from 1 onward can be exchanged and
    // the swapped segment is never empty.
    let mut lo = rng.gen_range(1..=a.len());
    let mut hi = rng.gen_range(1..a.len());
    if hi >= lo {
        hi += 1;
    } else {
        std::mem::swap(&mut lo, &mut hi);
    }
    for i in lo..hi {
        std::mem::swap(&mut a[i], &mut b[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: [f64; 7], status: Label) -> TrainingRow {
        TrainingRow {
            features: PERTURBATION_FEATURES.iter().copied().zip(values).collect(),
            status,
        }
    }

    /// Well-separated synthetic data: positives sit near the top of every
    /// abnormal direction, negatives near the bottom.
    fn separable_rows() -> Vec<TrainingRow> {
        let mut rows = Vec::new();
        for i in 0..10 {
            let jitter = 0.95 + 0.004 * i as f64;
            rows.push(row(
                [jitter, 0.95, 0.95, 0.01, 0.95, 0.95, 0.95],
                Label::Parkinsons,
            ));
            rows.push(row(
                [0.01, 0.05, 0.05, 0.95, 0.05, 0.05, 0.05],
                Label::Healthy,
            ));
        }
        rows
    }

    fn small_config(seed: u64) -> OptimizerConfig {
        OptimizerConfig {
            population_size: 30,
            generations: 10,
            seed,
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let rows = separable_rows();
        let a = ThresholdOptimizer::new(small_config(7))
            .optimize(&rows)
            .expect("Should optimize");
        let b = ThresholdOptimizer::new(small_config(7))
            .optimize(&rows)
            .expect("Should optimize");
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_can_exchange_every_gene_past_the_first() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut exchanged = [false; 7];
        for _ in 0..200 {
            let mut a: Genome = [0.0; 7];
            let mut b: Genome = [1.0; 7];
            two_point_crossover(&mut a, &mut b, &mut rng);
            assert_ne!(a, [0.0; 7], "Swapped segment must be non-empty");
            for (hit, &gene) in exchanged.iter_mut().zip(&a) {
                if gene == 1.0 {
                    *hit = true;
                }
            }
        }
        assert!(!exchanged[0], "First gene stays with its parent");
        assert!(exchanged[1..].iter().all(|&hit| hit));
    }

    #[test]
    fn test_finds_separating_thresholds() {
        let rows = separable_rows();
        let optimizer = ThresholdOptimizer::new(small_config(42));
        let thresholds = optimizer.optimize(&rows).expect("Should optimize");

        let accuracy = optimizer
            .cross_validated_accuracy(&thresholds, &rows)
            .expect("Should score");
        assert!(
            accuracy >= 0.95,
            "Expected near-perfect accuracy on separable data, got {accuracy}"
        );
    }

    #[test]
    fn test_rejects_too_small_training_set() {
        let rows = vec![row([0.5; 7], Label::Healthy); 3];
        let err = ThresholdOptimizer::new(OptimizerConfig::default())
            .optimize(&rows)
            .unwrap_err();
        assert!(matches!(err, NeurovoiceError::Validation(_)));
    }

    #[test]
    fn test_row_missing_feature_named() {
        let mut rows = separable_rows();
        let partial: FeatureSet = rows[0]
            .features
            .iter()
            .filter(|(name, _)| *name != "dfa")
            .collect();
        rows[0].features = partial;

        match ThresholdOptimizer::new(small_config(1))
            .optimize(&rows)
            .unwrap_err()
        {
            NeurovoiceError::MissingFeature(name) => assert_eq!(name, "dfa"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cross_validated_accuracy_on_fixed_thresholds() {
        let rows = separable_rows();
        let optimizer = ThresholdOptimizer::new(small_config(1));

        // Mid-range thresholds separate this data perfectly.
        let good = PerturbationThresholds::from_array([0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let accuracy = optimizer
            .cross_validated_accuracy(&good, &rows)
            .expect("Should score");
        assert_eq!(accuracy, 1.0);

        // A jitter gate nothing exceeds forces every prediction healthy.
        let closed = PerturbationThresholds::from_array([2.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let accuracy = optimizer
            .cross_validated_accuracy(&closed, &rows)
            .expect("Should score");
        assert!((accuracy - 0.5).abs() < 1e-9);
    }
}
