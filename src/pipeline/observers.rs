//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
    Error, Result,
    pipeline::metrics::{CurvePoint, EpisodeReport},
    ports::Observer,
    types::Outcome,
};

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
    last_average: Option<f64>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
            last_average: None,
        }
    }

    fn message(&self, epsilon: f64) -> String {
        let mut message = format!(
            "W:{} D:{} L:{} eps={epsilon:.3}",
            self.wins, self.draws, self.losses
        );
        if let Some(average) = self.last_average {
            message.push_str(&format!(" avg={average:.3}"));
        }
        message
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport, epsilon: f64) -> Result<()> {
        match report.outcome() {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64);
            // Formatting every episode dominates short runs.
            if episode.is_multiple_of(100) {
                pb.set_message(self.message(epsilon));
            }
        }
        Ok(())
    }

    fn on_curve_point(&mut self, point: &CurvePoint) -> Result<()> {
        self.last_average = Some(point.average_reward);
        if let Some(pb) = &self.progress_bar {
            pb.set_message(self.message(point.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("W:{} D:{} L:{}", self.wins, self.draws, self.losses));
        }
        Ok(())
    }
}

/// Console observer - one line per monitoring point
///
/// Prints `Episode     N | eps=0.300 | avg_reward(W)=0.123`, where `W` is the
/// rolling window length.
pub struct ConsoleLogObserver<W: Write = std::io::Stdout> {
    out: W,
    window: usize,
}

impl ConsoleLogObserver {
    /// Log to standard output
    pub fn stdout(window: usize) -> Self {
        Self::new(std::io::stdout(), window)
    }
}

impl<W: Write> ConsoleLogObserver<W> {
    pub fn new(out: W, window: usize) -> Self {
        Self { out, window }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for ConsoleLogObserver<W> {
    fn on_curve_point(&mut self, point: &CurvePoint) -> Result<()> {
        writeln!(
            self.out,
            "Episode {:5} | eps={:.3} | avg_reward({})={:.3}",
            point.episode, point.epsilon, self.window, point.average_reward
        )?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// CSV observer - writes the learning curve for external plotting
pub struct CsvCurveObserver {
    writer: csv::Writer<BufWriter<File>>,
}

impl CsvCurveObserver {
    /// Create a new CSV curve observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = csv::Writer::from_writer(create_file(path.as_ref())?);
        Ok(Self { writer })
    }
}

impl Observer for CsvCurveObserver {
    fn on_curve_point(&mut self, point: &CurvePoint) -> Result<()> {
        self.writer.serialize(point)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EpisodeRecord<'a> {
    episode: usize,
    epsilon: f64,
    outcome: Outcome,
    #[serde(flatten)]
    report: &'a EpisodeReport,
}

/// JSONL observer - Exports one record per episode in JSON Lines format
pub struct JsonlEpisodeObserver {
    writer: BufWriter<File>,
}

impl JsonlEpisodeObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: create_file(path.as_ref())?,
        })
    }
}

impl Observer for JsonlEpisodeObserver {
    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport, epsilon: f64) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            epsilon,
            outcome: report.outcome(),
            report,
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn point(episode: usize, average_reward: f64) -> CurvePoint {
        CurvePoint {
            episode,
            epsilon: 0.25,
            average_reward,
        }
    }

    #[test]
    fn test_console_log_line_format() {
        let mut observer = ConsoleLogObserver::new(Vec::new(), 16000);
        observer.on_curve_point(&point(4000, -0.125)).unwrap();
        observer.on_training_end().unwrap();

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(text, "Episode  4000 | eps=0.250 | avg_reward(16000)=-0.125\n");
    }

    #[test]
    fn test_csv_curve_has_header_and_rows() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("curve.csv");

        let mut observer = CsvCurveObserver::new(&path).unwrap();
        observer.on_curve_point(&point(5, 0.5)).unwrap();
        observer.on_curve_point(&point(10, 1.0)).unwrap();
        observer.on_training_end().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "episode,epsilon,average_reward");
        assert_eq!(lines[1], "5,0.25,0.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_jsonl_writes_one_line_per_episode() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("episodes.jsonl");

        let mut observer = JsonlEpisodeObserver::new(&path).unwrap();
        let report = EpisodeReport {
            plies: 5,
            final_reward: -1.0,
            total_reward: -1.0,
            updates: 2,
        };
        observer.on_episode_end(1, &report, 0.3).unwrap();
        observer.on_episode_end(2, &report, 0.29).unwrap();
        observer.on_training_end().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(first["outcome"], "loss");
        assert_eq!(first["plies"], 5);
    }

    #[test]
    fn test_progress_observer_without_start_is_silent() {
        let mut observer = ProgressObserver::new();
        let report = EpisodeReport::default();
        observer.on_episode_end(1, &report, 0.3).unwrap();
        observer.on_training_end().unwrap();
        assert_eq!(observer.draws, 1);
    }
}
