//! Observer port - abstraction for training observation and monitoring
//!
//! The training loop owns no global buffers; every monitoring point is
//! handed to the observers the caller injected.

use crate::{
    Result,
    pipeline::{CurvePoint, EpisodeReport},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_end(episode, report, epsilon)`
///    - `on_curve_point(point)` - Only on logging episodes
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use qlearn_ttt::{pipeline::CurvePoint, ports::Observer};
///
/// struct LastPoint(Option<CurvePoint>);
///
/// impl Observer for LastPoint {
///     fn on_curve_point(&mut self, point: &CurvePoint) -> qlearn_ttt::Result<()> {
///         self.0 = Some(point.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode, once exploration has been decayed.
    ///
    /// `episode` is 1-based.
    fn on_episode_end(
        &mut self,
        _episode: usize,
        _report: &EpisodeReport,
        _epsilon: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called with each rolling-average monitoring point.
    fn on_curve_point(&mut self, _point: &CurvePoint) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to flush files or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
