//! Timing of analyses over generated graphs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{AnalysisKind, BenchConfig, BenchResult};
use crate::generate::generate_seeded;

/// One timed run, or the mean of several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSample {
    /// Density factor the graph was generated with
    pub density: f64,
    /// Requested node count
    pub size: usize,
    /// Number of nodes |V|
    pub vertices: f64,
    /// Number of edges |E|
    pub edges: f64,
    /// Wall-clock duration of the analysis in seconds
    pub seconds: f64,
}

/// Generates one graph and times `analysis` on it.
pub fn measure(seed: u64, size: usize, density: f64, analysis: AnalysisKind) -> BenchResult<RuntimeSample> {
    let graph = generate_seeded(size, density, seed)?;

    let start = Instant::now();
    analysis.run(&graph)?;
    let seconds = start.elapsed().as_secs_f64();

    Ok(RuntimeSample {
        density,
        size,
        vertices: graph.node_count() as f64,
        edges: graph.edge_count() as f64,
        seconds,
    })
}

/// Runs the whole grid of `config`, one sample per generated graph.
pub fn run_benchmark(config: &BenchConfig) -> BenchResult<Vec<RuntimeSample>> {
    let mut samples =
        Vec::with_capacity(config.densities.len() * config.sizes.len() * config.iterations);

    for &density in &config.densities {
        log::info!("Running with density factor {}", density);
        for &size in &config.sizes {
            log::info!("Running with size {}", size);
            for iteration in 0..config.iterations {
                let seed = config.base_seed + iteration as u64;
                samples.push(measure(seed, size, density, config.analysis)?);
            }
        }
    }

    Ok(samples)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Averages samples per `(density, size)` bucket.
///
/// Buckets keep the order in which they first appear; means are rounded to
/// three decimals.
pub fn average_runtimes(samples: &[RuntimeSample]) -> Vec<RuntimeSample> {
    let mut order: Vec<(f64, usize)> = Vec::new();
    let mut groups: HashMap<(u64, usize), Vec<&RuntimeSample>> = HashMap::new();

    for sample in samples {
        let key = (sample.density.to_bits(), sample.size);
        let group = groups.entry(key).or_default();
        if group.is_empty() {
            order.push((sample.density, sample.size));
        }
        group.push(sample);
    }

    order
        .into_iter()
        .map(|(density, size)| {
            let group = &groups[&(density.to_bits(), size)];
            let count = group.len() as f64;
            let mean = |field: fn(&RuntimeSample) -> f64| {
                round3(group.iter().map(|s| field(s)).sum::<f64>() / count)
            };

            RuntimeSample {
                density,
                size,
                vertices: mean(|s| s.vertices),
                edges: mean(|s| s.edges),
                seconds: mean(|s| s.seconds),
            }
        })
        .collect()
}

/// Writes samples to a JSON file.
pub fn save_runtimes(path: &Path, samples: &[RuntimeSample]) -> BenchResult<()> {
    let json = serde_json::to_string_pretty(samples)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads samples from a JSON file written by [`save_runtimes`].
pub fn load_runtimes(path: &Path) -> BenchResult<Vec<RuntimeSample>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(density: f64, size: usize, vertices: f64, edges: f64, seconds: f64) -> RuntimeSample {
        RuntimeSample {
            density,
            size,
            vertices,
            edges,
            seconds,
        }
    }

    #[test]
    fn test_measure_reports_graph_size() {
        let result = measure(225, 50, 1.0, AnalysisKind::Scc).unwrap();
        assert_eq!(result.size, 50);
        assert_eq!(result.vertices, 50.0);
        assert!(result.edges > 0.0);
        assert!(result.seconds >= 0.0);
    }

    #[test]
    fn test_run_benchmark_grid() {
        let config = BenchConfig {
            densities: vec![0.5, 2.0],
            sizes: vec![10, 30],
            iterations: 3,
            base_seed: 1,
            analysis: AnalysisKind::Prepost,
        };
        let samples = run_benchmark(&config).unwrap();

        assert_eq!(samples.len(), 12);
        assert_eq!(samples[0].density, 0.5);
        assert_eq!(samples[3].size, 30);
        assert_eq!(samples[6].density, 2.0);
    }

    #[test]
    fn test_average_runtimes() {
        let samples = vec![
            sample(1.0, 10, 10.0, 20.0, 0.001),
            sample(0.5, 10, 10.0, 8.0, 0.004),
            sample(1.0, 10, 10.0, 30.0, 0.002),
        ];
        let averaged = average_runtimes(&samples);

        assert_eq!(
            averaged,
            vec![
                sample(1.0, 10, 10.0, 25.0, 0.002),
                sample(0.5, 10, 10.0, 8.0, 0.004),
            ]
        );
    }

    #[test]
    fn test_average_runtimes_empty() {
        assert!(average_runtimes(&[]).is_empty());
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(0.0004), 0.0);
    }

    #[test]
    fn test_runtimes_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("sccscope-runtimes-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("runtimes.json");

        let samples = vec![sample(0.25, 100, 100.0, 140.0, 0.0012)];
        save_runtimes(&path, &samples).unwrap();
        assert_eq!(load_runtimes(&path).unwrap(), samples);

        fs::remove_dir_all(&dir).unwrap();
    }
}
