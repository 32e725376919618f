//! Polars conversion and parquet output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::subscriber::{clear, drain, install_subscriber};
use crate::table::{DynamicTable, Recorder, TypedColumn};

impl DynamicTable {
    /// Convert to a DataFrame, columns sorted by name.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut names: Vec<&String> = self.columns.keys().collect();
        names.sort();

        let columns: Vec<Column> = names
            .into_iter()
            .map(|name| match &self.columns[name] {
                TypedColumn::U64(v) => Column::new(name.into(), v),
                TypedColumn::I64(v) => Column::new(name.into(), v),
                TypedColumn::F64(v) => Column::new(name.into(), v),
                TypedColumn::Bool(v) => Column::new(name.into(), v),
                TypedColumn::Str(v) => Column::new(name.into(), v),
            })
            .collect();

        DataFrame::new(columns)
    }
}

impl Recorder {
    /// One DataFrame per target. Tables that fail to convert are skipped.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

pub fn drain_to_dataframes() -> HashMap<String, DataFrame> {
    drain().to_dataframes()
}

fn io_error(e: std::io::Error) -> PolarsError {
    PolarsError::IO {
        error: e.into(),
        msg: None,
    }
}

/// Write each DataFrame to `{dir}/{target}.parquet`.
pub fn save_parquet(dfs: &mut HashMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    std::fs::create_dir_all(dir).map_err(io_error)?;
    for (name, df) in dfs.iter_mut() {
        let file = std::fs::File::create(dir.join(format!("{}.parquet", name))).map_err(io_error)?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

/// Replace anything but ASCII alphanumerics, `-` and `_` so a run name is a
/// safe single path component.
fn sanitize(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    s.chars().take(60).collect()
}

/// Records a run for as long as it lives, then writes it to disk.
///
/// Creation clears this thread's recorder and installs the subscriber. On
/// drop every target is written as `{run_dir}/{target}.parquet`, followed by
/// an empty `_ready` file once all tables are complete. Nothing is written if
/// no events were recorded.
///
/// ```ignore
/// let mut rec = instrument::ScopedRecorder::named("data", "heavy outbreak");
/// // ... run the township ...
/// let deaths = &rec.get()["death"];
/// // drop writes data/heavy_outbreak/*.parquet + _ready
/// ```
pub struct ScopedRecorder {
    run_dir: PathBuf,
    dfs: Option<HashMap<String, DataFrame>>,
}

impl ScopedRecorder {
    /// Record into `run_dir` exactly.
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        clear();
        install_subscriber();
        Self {
            run_dir: run_dir.into(),
            dfs: None,
        }
    }

    /// Record into `{parent}/{name}`, with `name` sanitized.
    pub fn named(parent: impl Into<PathBuf>, name: &str) -> Self {
        Self::new(parent.into().join(sanitize(name)))
    }

    /// Drain on first call; later calls return the cached frames.
    pub fn get(&mut self) -> &HashMap<String, DataFrame> {
        self.dfs.get_or_insert_with(drain_to_dataframes)
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    fn write(&mut self) -> PolarsResult<usize> {
        let mut dfs = self.dfs.take().unwrap_or_else(drain_to_dataframes);
        if dfs.is_empty() {
            return Ok(0);
        }
        save_parquet(&mut dfs, &self.run_dir)?;
        std::fs::File::create(self.run_dir.join("_ready")).map_err(io_error)?;
        Ok(dfs.len())
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        match self.write() {
            Ok(0) => {}
            Ok(n) => eprintln!("ScopedRecorder: wrote {} tables to {}", n, self.run_dir.display()),
            Err(e) => eprintln!(
                "ScopedRecorder({}): failed to write parquet: {}",
                self.run_dir.display(),
                e
            ),
        }
    }
}
