//! Multi-file trace loading.

use crate::config::GrapherConfig;
use crate::errors::{LoadError, LoadResult};
use crate::line::{match_line, NodeDecl, TraceLine};
use crate::metrics::LoadMetrics;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use taskdag::{DagBuilder, EdgeInsert, TaskDag};

/// Information about one successfully loaded trace file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Path of the trace
    pub file_path: PathBuf,

    /// Lines read
    pub line_count: usize,

    /// Node lines read
    pub node_count: usize,

    /// Edge lines read
    pub edge_count: usize,

    /// Time taken to load this file
    pub load_time: Duration,
}

impl FileSummary {
    fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            line_count: 0,
            node_count: 0,
            edge_count: 0,
            load_time: Duration::ZERO,
        }
    }
}

/// Loads grapher traces into a [`DagBuilder`].
///
/// Loading is fail-fast: the first line that cannot be used aborts the load,
/// and [`GrapherLoader::load_all`] then returns no graph at all.
///
/// # Example
///
/// ```
/// use taskdag::DagBuilder;
/// use taskdag_grapher::GrapherLoader;
/// use std::path::Path;
///
/// let trace = "digraph G {\n}\n";
/// let mut loader = GrapherLoader::new();
/// let mut builder = DagBuilder::new();
/// let summary = loader.load_source(trace, Path::new("empty.dot"), &mut builder).unwrap();
/// assert_eq!(summary.line_count, 2);
/// ```
#[derive(Debug, Default)]
pub struct GrapherLoader {
    config: GrapherConfig,
    metrics: LoadMetrics,
}

impl GrapherLoader {
    /// Create a loader with the permissive default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with an explicit config.
    pub fn with_config(config: GrapherConfig) -> Self {
        Self {
            config,
            metrics: LoadMetrics::default(),
        }
    }

    /// The active config.
    pub fn config(&self) -> &GrapherConfig {
        &self.config
    }

    /// Metrics accumulated since creation or the last reset.
    pub fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    /// Reset accumulated metrics.
    pub fn reset_metrics(&mut self) {
        self.metrics = LoadMetrics::default();
    }

    /// Load every trace, in order, into one DAG.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] met in any file; the graph built so
    /// far is discarded.
    pub fn load_all<I, P>(&mut self, paths: I) -> LoadResult<TaskDag>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut builder = DagBuilder::with_policy(self.config.policy);
        for path in paths {
            self.load_file(path.as_ref(), &mut builder)?;
        }

        let dag = builder.finish();
        info!(
            "Loaded {} trace file(s): {} nodes, {} edges",
            self.metrics.files_loaded,
            dag.node_count(),
            dag.edge_count()
        );
        Ok(dag)
    }

    /// Load one trace file into `builder`.
    ///
    /// The file is closed before returning, on success and on error alike.
    ///
    /// # Errors
    ///
    /// - [`LoadError::FileAccess`] if the file cannot be opened or read
    /// - [`LoadError::Format`], [`LoadError::Schema`] or
    ///   [`LoadError::Conflict`] for the first unusable line
    pub fn load_file(&mut self, path: &Path, builder: &mut DagBuilder) -> LoadResult<FileSummary> {
        debug!("Loading trace {}", path.display());
        let file = File::open(path).map_err(|e| LoadError::FileAccess(path.to_path_buf(), e))?;
        self.load_reader(BufReader::new(file), path, builder)
    }

    /// Load trace text held in memory; `origin` is only used in errors.
    ///
    /// # Errors
    ///
    /// Same as [`GrapherLoader::load_file`], minus opening the file.
    pub fn load_source(
        &mut self,
        source: &str,
        origin: &Path,
        builder: &mut DagBuilder,
    ) -> LoadResult<FileSummary> {
        self.load_reader(source.as_bytes(), origin, builder)
    }

    /// Load trace lines from any buffered reader.
    ///
    /// Line numbers start at 1 for every call.
    ///
    /// # Errors
    ///
    /// Same as [`GrapherLoader::load_file`]. Read failures, including
    /// invalid UTF-8, are reported as [`LoadError::FileAccess`].
    pub fn load_reader<R: BufRead>(
        &mut self,
        reader: R,
        origin: &Path,
        builder: &mut DagBuilder,
    ) -> LoadResult<FileSummary> {
        let start = Instant::now();
        let mut summary = FileSummary::new(origin);

        for (index, line) in reader.lines().enumerate() {
            let text = line.map_err(|e| LoadError::FileAccess(origin.to_path_buf(), e))?;
            summary.line_count = index + 1;
            self.metrics.lines_read += 1;
            self.apply_line(&text, index + 1, origin, builder, &mut summary)?;
        }

        summary.load_time = start.elapsed();
        self.metrics.files_loaded += 1;
        self.metrics.load_time += summary.load_time;
        debug!(
            "Read {} lines from {} ({} nodes, {} edges)",
            summary.line_count,
            origin.display(),
            summary.node_count,
            summary.edge_count
        );

        Ok(summary)
    }

    fn apply_line(
        &mut self,
        text: &str,
        line: usize,
        file: &Path,
        builder: &mut DagBuilder,
        summary: &mut FileSummary,
    ) -> LoadResult<()> {
        let parsed = match_line(text).map_err(|e| LoadError::Schema {
            file: file.to_path_buf(),
            line,
            message: e.to_string(),
            text: text.to_string(),
        })?;

        match parsed {
            None => Err(LoadError::Format {
                file: file.to_path_buf(),
                line,
                text: text.to_string(),
            }),
            Some(TraceLine::Node(decl)) => {
                self.check_taskpool(&decl, text, line, file)?;
                let insert = builder
                    .add_node(decl.node)
                    .map_err(|source| LoadError::Conflict {
                        file: file.to_path_buf(),
                        line,
                        source,
                    })?;

                summary.node_count += 1;
                self.metrics.nodes_declared += 1;
                if insert.replaced {
                    self.metrics.nodes_redeclared += 1;
                }
                if insert.displaced.is_some() {
                    self.metrics.task_ids_reassigned += 1;
                }
                Ok(())
            }
            Some(TraceLine::Edge(edge)) => {
                if builder.add_edge(edge) == EdgeInsert::Merged {
                    self.metrics.edges_merged += 1;
                }
                summary.edge_count += 1;
                self.metrics.edges_declared += 1;
                Ok(())
            }
            Some(delimiter) => {
                trace!("{} at line {line} of {}", delimiter.shape(), file.display());
                Ok(())
            }
        }
    }

    fn check_taskpool(&self, decl: &NodeDecl, text: &str, line: usize, file: &Path) -> LoadResult<()> {
        if decl.taskpool_consistent() {
            return Ok(());
        }

        let message = format!(
            "Node '{}' has taskpool {} in its label but {} in its tooltip",
            decl.node.name, decl.node.taskpool_id, decl.tooltip_taskpool_id
        );
        if self.config.check_taskpool {
            return Err(LoadError::Schema {
                file: file.to_path_buf(),
                line,
                message,
                text: text.to_string(),
            });
        }

        warn!("{message} (line {line} of {})", file.display());
        Ok(())
    }
}

/// Load every trace, in order, into one DAG using the default config.
///
/// # Errors
///
/// Returns the first [`LoadError`] met in any file.
pub fn load_all<I, P>(paths: I) -> LoadResult<TaskDag>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    GrapherLoader::new().load_all(paths)
}
