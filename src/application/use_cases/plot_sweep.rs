use crate::domain::chart::{artifact_file_name, artifact_stems, ChartKind};
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::render::{ChartData, ChartRenderer};
use std::sync::Arc;

/// Renders every chart kind for every numeric column and stores the images.
#[derive(Clone)]
pub struct PlotSweepUseCase {
    renderer: Arc<dyn ChartRenderer + Send + Sync>,
    store: Arc<ArtifactStore>,
}

impl PlotSweepUseCase {
    pub fn new(renderer: Arc<dyn ChartRenderer + Send + Sync>, store: Arc<ArtifactStore>) -> Self {
        Self { renderer, store }
    }

    /// Returns the stored artifact names in generation order.
    ///
    /// Scatter charts plot each column against the first numeric column and
    /// are skipped when the table has a single numeric column. Columns whose
    /// file stems collide are told apart by a `.{n}` suffix. The first
    /// failure stops the sweep; images saved before it stay in the store.
    pub fn execute(&self, table: &Table) -> Result<Vec<String>> {
        let numeric = table.numeric_columns();
        if numeric.is_empty() {
            return Err(AppError::NoNumericColumns);
        }

        let series: Vec<(&str, Vec<f64>)> = numeric
            .iter()
            .map(|column| (column.name(), column.numbers()))
            .collect();
        let (x_name, x_values) = (series[0].0, series[0].1.as_slice());
        let with_scatter = series.len() >= 2;
        let stems = artifact_stems(series.iter().map(|(name, _)| *name));

        let mut produced = Vec::with_capacity(series.len() * ChartKind::ALL.len());
        for ((name, values), stem) in series.iter().zip(&stems) {
            for kind in ChartKind::ALL {
                let x_axis = match kind {
                    ChartKind::Scatter if !with_scatter => continue,
                    ChartKind::Scatter => Some((x_name, x_values)),
                    _ => None,
                };
                let chart = ChartData {
                    kind,
                    column: name,
                    values,
                    x_axis,
                };

                let bytes = self.renderer.render(&chart)?;
                let file_name = artifact_file_name(stem, kind);
                self.store.save(&file_name, &bytes)?;
                tracing::debug!(artifact = %file_name, bytes = bytes.len(), "Stored chart");
                produced.push(file_name);
            }
        }

        tracing::info!(
            numeric_columns = series.len(),
            artifacts = produced.len(),
            "Plot sweep finished"
        );
        Ok(produced)
    }
}
