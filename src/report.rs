use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::{algo::EpisodeStats, env::Outcome, util::moving_average, Result};

/// Default width of the moving average in the learning curve
pub const DEFAULT_WINDOW: usize = 100;

#[derive(Serialize)]
struct Row {
    episode: usize,
    reward: f64,
    steps: u32,
    outcome: &'static str,
    moving_average: f64,
}

fn outcome_label(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        Some(Outcome::ReachedCheese) => "cheese",
        Some(Outcome::Captured) => "captured",
        None => "truncated",
    }
}

/// Write one CSV row per episode with its total reward and a trailing moving average over
/// `window` episodes, ready for an external plotting tool
pub fn write_learning_curve(
    path: impl AsRef<Path>,
    history: &[EpisodeStats],
    window: usize,
) -> Result<()> {
    let path = path.as_ref();
    let rewards = history.iter().map(|s| s.total_reward).collect::<Vec<_>>();
    let averages = moving_average(&rewards, window);

    let mut wtr = csv::Writer::from_path(path)?;
    for (i, (stats, avg)) in history.iter().zip(averages).enumerate() {
        wtr.serialize(Row {
            episode: i,
            reward: stats.total_reward,
            steps: stats.steps,
            outcome: outcome_label(stats.outcome),
            moving_average: avg,
        })?;
    }
    wtr.flush().map_err(|e| crate::Error::io(e, path))?;
    debug!("Wrote learning curve of {} episodes to {}", history.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_has_header_and_one_row_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        let history = [
            EpisodeStats {
                total_reward: 4.0,
                steps: 3,
                outcome: Some(Outcome::ReachedCheese),
            },
            EpisodeStats {
                total_reward: -2.0,
                steps: 7,
                outcome: Some(Outcome::Captured),
            },
            EpisodeStats {
                total_reward: 1.0,
                steps: 9,
                outcome: None,
            },
        ];
        write_learning_curve(&path, &history, 2).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "episode,reward,steps,outcome,moving_average",
                "0,4.0,3,cheese,4.0",
                "1,-2.0,7,captured,1.0",
                "2,1.0,9,truncated,-0.5",
            ]
        );
    }
}
