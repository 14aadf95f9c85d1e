use std::path::PathBuf;

/// Default CSV produced by the data-cleaning notebook.
pub const DEFAULT_DATA_PATH: &str = "data_cleaned.csv";
pub const DEFAULT_BINS: usize = 20;

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// CSV to load (`DASHBOARD_DATA`).
    pub data_path: PathBuf,
    /// Bin count for the filtered histograms (`DASHBOARD_BINS`).
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(path) = lookup("DASHBOARD_DATA").filter(|p| !p.trim().is_empty()) {
            cfg.data_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("DASHBOARD_BINS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => cfg.histogram_bins = n,
                _ => log::warn!(
                    "Ignoring DASHBOARD_BINS={raw:?}; using {DEFAULT_BINS} bins"
                ),
            }
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(vars: &[(&str, &str)]) -> DashboardConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(cfg(&[]), DashboardConfig::default());
    }

    #[test]
    fn test_overrides() {
        let c = cfg(&[("DASHBOARD_DATA", "/tmp/students.csv"), ("DASHBOARD_BINS", "35")]);
        assert_eq!(c.data_path, PathBuf::from("/tmp/students.csv"));
        assert_eq!(c.histogram_bins, 35);
    }

    #[test]
    fn test_invalid_bins_fall_back() {
        assert_eq!(cfg(&[("DASHBOARD_BINS", "0")]).histogram_bins, DEFAULT_BINS);
        assert_eq!(cfg(&[("DASHBOARD_BINS", "lots")]).histogram_bins, DEFAULT_BINS);
    }
}
