use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics collected while loading traces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadMetrics {
    /// Files fully read
    pub files_loaded: usize,

    /// Lines read, across all files
    pub lines_read: usize,

    /// Node lines seen (including redeclarations)
    pub nodes_declared: usize,

    /// Edge lines seen
    pub edges_declared: usize,

    /// Node lines that replaced an earlier declaration of the same name
    pub nodes_redeclared: usize,

    /// Task ids taken over from a different name
    pub task_ids_reassigned: usize,

    /// Edge lines merged into an existing parallel edge
    pub edges_merged: usize,

    /// Total time spent loading
    #[serde(with = "duration_serde")]
    pub load_time: Duration,
}

// Helper module for serializing Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

impl LoadMetrics {
    /// Lines that carried no node or edge (graph delimiters)
    pub fn delimiter_lines(&self) -> usize {
        self.lines_read
            .saturating_sub(self.nodes_declared + self.edges_declared)
    }

    /// Lines processed per second (0.0 if no time elapsed)
    pub fn lines_per_second(&self) -> f64 {
        let secs = self.load_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.lines_read as f64 / secs
        }
    }

    /// Merge another set of metrics into this one
    pub fn merge(&mut self, other: &LoadMetrics) {
        self.files_loaded += other.files_loaded;
        self.lines_read += other.lines_read;
        self.nodes_declared += other.nodes_declared;
        self.edges_declared += other.edges_declared;
        self.nodes_redeclared += other.nodes_redeclared;
        self.task_ids_reassigned += other.task_ids_reassigned;
        self.edges_merged += other.edges_merged;
        self.load_time += other.load_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_lines() {
        let metrics = LoadMetrics {
            lines_read: 10,
            nodes_declared: 5,
            edges_declared: 3,
            ..Default::default()
        };
        assert_eq!(metrics.delimiter_lines(), 2);
    }

    #[test]
    fn test_merge() {
        let mut total = LoadMetrics {
            files_loaded: 1,
            lines_read: 4,
            load_time: Duration::from_millis(10),
            ..Default::default()
        };
        total.merge(&LoadMetrics {
            files_loaded: 2,
            lines_read: 6,
            nodes_redeclared: 1,
            load_time: Duration::from_millis(5),
            ..Default::default()
        });
        assert_eq!(total.files_loaded, 3);
        assert_eq!(total.lines_read, 10);
        assert_eq!(total.nodes_redeclared, 1);
        assert_eq!(total.load_time, Duration::from_millis(15));
    }

    #[test]
    fn test_lines_per_second_without_time() {
        assert_eq!(LoadMetrics::default().lines_per_second(), 0.0);
    }

    #[test]
    fn test_metrics_serialize_load_time_as_seconds() {
        let metrics = LoadMetrics {
            load_time: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["load_time"], 1.5);
    }
}
