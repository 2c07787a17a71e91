//! End-of-run diagnostics.

use std::collections::BTreeMap;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::EngineResult;

/// Counters and the move-count histogram for one relocation run.
///
/// Purely diagnostic: nothing here feeds back into control flow.  Counters
/// start at zero for every run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Total relocation events (an agent moving twice counts twice).
    pub relocation_events: u64,

    /// `(origin, destination)` cells skipped because the origin zone had no
    /// resident agents in the index at query time.
    pub empty_source_cells: u64,

    /// Running sum of the matrix's expected move counts, scaled by the
    /// configured scaling factor.  Accrued per non-empty cell regardless of
    /// how many agents actually moved.
    pub expected_movers: f64,

    /// Agents grouped by how often they moved; never-moved agents omitted.
    pub move_count_histogram: BTreeMap<u32, usize>,
}

impl RunReport {
    /// Total distinct agents that moved at least once.
    pub fn moved_agents(&self) -> usize {
        self.move_count_histogram.values().sum()
    }

    /// Emit the run summary at info level.
    pub fn log_summary(&self) {
        info!("expected people to move (scaled): {:.2}", self.expected_movers);
        info!("relocation events: {}", self.relocation_events);
        info!("moved agents: {}", self.moved_agents());
        info!("empty source cells: {}", self.empty_source_cells);
        for (moves, agents) in &self.move_count_histogram {
            info!("{agents} agents moved {moves} times");
        }
    }

    /// Write the move-count histogram as CSV (`move_count,agents`).
    pub fn write_histogram_csv(&self, path: &Path) -> EngineResult<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["move_count", "agents"])?;
        for (moves, agents) in &self.move_count_histogram {
            writer.write_record(&[moves.to_string(), agents.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}
