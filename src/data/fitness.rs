use crate::config::EvolutionSettings;
use crate::error::{Result, SymregError};
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use polars::prelude::*;

/// Dense table of fitness values: one row per generation, one column per individual.
///
/// Rows are allocated up front (`generations + 1`, the initial population
/// included) and filled in order by `record_generation`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessTable {
    values: Array2<f64>,
    filled: usize,
}

impl FitnessTable {
    pub fn new(generations: usize, individuals: usize) -> Result<Self> {
        let rows = generations.checked_add(1).ok_or_else(|| {
            SymregError::FitnessTable(format!("{} generations is too many", generations))
        })?;
        rows.checked_mul(individuals)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
            .filter(|bytes| *bytes <= isize::MAX as usize)
            .ok_or_else(|| {
                SymregError::FitnessTable(format!(
                    "A {} x {} table does not fit in memory",
                    rows, individuals
                ))
            })?;

        Ok(Self {
            values: Array2::zeros((rows, individuals)),
            filled: 0,
        })
    }

    /// Sized from NGEN and N
    pub fn from_settings(settings: &EvolutionSettings) -> Result<Self> {
        Self::new(settings.generations, settings.population_size)
    }

    /// Stores one generation's fitnesses in the next free row and returns its index.
    pub fn record_generation(&mut self, fitnesses: &[f64]) -> Result<usize> {
        if fitnesses.len() != self.individuals() {
            return Err(SymregError::FitnessTable(format!(
                "Expected {} fitness values, got {}",
                self.individuals(),
                fitnesses.len()
            )));
        }
        if self.is_full() {
            return Err(SymregError::FitnessTable(format!(
                "All {} generations already recorded",
                self.rows()
            )));
        }

        let row = self.filled;
        self.values.row_mut(row).assign(&ArrayView1::from(fitnesses));
        self.filled += 1;
        log::debug!("Recorded fitnesses of generation {}", row);
        Ok(row)
    }

    /// Caps every value above `max` to `max`, then lifts every value below `min` to `min`.
    pub fn clamp(&mut self, max: Option<f64>, min: Option<f64>) {
        if let Some(max) = max {
            self.values.mapv_inplace(|v| if v > max { max } else { v });
        }
        if let Some(min) = min {
            self.values.mapv_inplace(|v| if v < min { min } else { v });
        }
    }

    /// Orders each generation's fitnesses from low to high.
    pub fn sort_generations(&mut self) {
        for mut row in self.values.rows_mut() {
            if let Some(row) = row.as_slice_mut() {
                row.sort_by(f64::total_cmp);
            }
        }
    }

    pub fn generation(&self, index: usize) -> Option<&[f64]> {
        if index < self.rows() {
            self.values.row(index).to_slice()
        } else {
            None
        }
    }

    /// Lowest fitness of a recorded generation
    pub fn best(&self, index: usize) -> Option<f64> {
        if index >= self.filled {
            return None;
        }
        self.values
            .row(index)
            .iter()
            .copied()
            .min_by(f64::total_cmp)
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn individuals(&self) -> usize {
        self.values.ncols()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.rows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Row-major view of the whole table
    pub fn as_slice(&self) -> &[f64] {
        // zeros() allocates in standard layout, so this is always contiguous
        self.values.as_slice().unwrap_or(&[])
    }

    /// Long-format frame (`generation`, `individual`, `fitness`) of the recorded rows
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let individuals = self.individuals();
        let cells = self.filled * individuals;
        let mut generation = Vec::with_capacity(cells);
        let mut individual = Vec::with_capacity(cells);
        for row in 0..self.filled {
            for column in 0..individuals {
                generation.push(row as u32);
                individual.push(column as u32);
            }
        }
        let fitness: Vec<f64> = self
            .values
            .slice(s![..self.filled, ..])
            .iter()
            .copied()
            .collect();

        let df = df!(
            "generation" => generation,
            "individual" => individual,
            "fitness" => fitness
        )?;
        Ok(df)
    }

    /// Per-generation `min`, `max` and `mean` of the recorded rows
    pub fn generation_summary(&self) -> Result<DataFrame> {
        let summary = self
            .to_dataframe()?
            .lazy()
            .group_by_stable([col("generation")])
            .agg([
                col("fitness").min().alias("min"),
                col("fitness").max().alias("max"),
                col("fitness").mean().alias("mean"),
            ])
            .collect()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FitnessTable {
        let mut table = FitnessTable::new(2, 3).unwrap();
        table.record_generation(&[3.0, 1.0, 2.0]).unwrap();
        table.record_generation(&[0.5, 9.0, -1.0]).unwrap();
        table
    }

    #[test]
    fn test_shape() {
        let table = FitnessTable::new(50, 400).unwrap();
        assert_eq!(table.rows(), 51);
        assert_eq!(table.individuals(), 400);
        assert_eq!(table.as_slice().len(), 51 * 400);
        assert!(table.as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_oversized_table_is_rejected() {
        assert!(matches!(
            FitnessTable::new(usize::MAX, 1),
            Err(SymregError::FitnessTable(_))
        ));
        assert!(matches!(
            FitnessTable::new(1 << 40, 1 << 40),
            Err(SymregError::FitnessTable(_))
        ));
        let settings = EvolutionSettings {
            generations: usize::MAX / 2,
            population_size: 16,
            ..EvolutionSettings::default()
        };
        assert!(FitnessTable::from_settings(&settings).is_err());
    }

    #[test]
    fn test_empty_population() {
        let table = FitnessTable::new(3, 0).unwrap();
        assert_eq!(table.rows(), 4);
        assert_eq!(table.generation(0), Some(&[][..]));
        assert!(table.as_slice().is_empty());
    }

    #[test]
    fn test_from_settings() {
        let settings = EvolutionSettings {
            generations: 4,
            population_size: 10,
            ..EvolutionSettings::default()
        };
        let table = FitnessTable::from_settings(&settings).unwrap();
        assert_eq!((table.rows(), table.individuals()), (5, 10));
    }

    #[test]
    fn test_record_fills_rows_in_order() {
        let mut table = FitnessTable::new(1, 2).unwrap();
        assert_eq!(table.record_generation(&[0.0, 0.0]).unwrap(), 0);
        assert_eq!(table.record_generation(&[-1.0, 4.0]).unwrap(), 1);
        assert_eq!(table.generation(1), Some(&[-1.0, 4.0][..]));
        assert!(table.is_full());
        assert!(table.record_generation(&[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_record_rejects_wrong_width() {
        let mut table = FitnessTable::new(1, 2).unwrap();
        assert!(table.record_generation(&[1.0]).is_err());
        assert_eq!(table.filled(), 0);
    }

    #[test]
    fn test_clamp() {
        let mut table = table();
        table.clamp(Some(2.5), Some(0.0));
        assert_eq!(table.generation(0), Some(&[2.5, 1.0, 2.0][..]));
        assert_eq!(table.generation(1), Some(&[0.5, 2.5, 0.0][..]));
    }

    #[test]
    fn test_clamp_one_side() {
        let mut table = table();
        table.clamp(None, Some(1.0));
        assert_eq!(table.generation(1), Some(&[1.0, 9.0, 1.0][..]));
    }

    #[test]
    fn test_sort_generations() {
        let mut table = table();
        let before = table.clone();
        table.sort_generations();
        assert_eq!(table.generation(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(table.generation(1), Some(&[-1.0, 0.5, 9.0][..]));
        assert_eq!(table.view().row(2).to_vec(), vec![0.0, 0.0, 0.0]);
        // clones are independent copies
        assert_eq!(before.generation(0), Some(&[3.0, 1.0, 2.0][..]));
    }

    #[test]
    fn test_generation_bounds() {
        let table = table();
        assert!(table.generation(2).is_some());
        assert!(table.generation(3).is_none());
    }

    #[test]
    fn test_best() {
        let table = table();
        assert_eq!(table.best(0), Some(1.0));
        assert_eq!(table.best(1), Some(-1.0));
        assert_eq!(table.best(2), None);
    }

    #[test]
    fn test_to_dataframe() {
        let df = table().to_dataframe().unwrap();
        assert_eq!(df.height(), 6);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_generation_summary() {
        let summary = table().generation_summary().unwrap();
        assert_eq!(summary.height(), 2);
        let min = summary.column("min").unwrap().as_materialized_series().clone();
        let max = summary.column("max").unwrap().as_materialized_series().clone();
        assert_eq!(min.f64().unwrap().get(1), Some(-1.0));
        assert_eq!(max.f64().unwrap().get(0), Some(3.0));
    }
}
