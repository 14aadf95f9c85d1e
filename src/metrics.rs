use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Static evaluation results for the three graduation classifiers
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// The fixed set of evaluated models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum ModelName {
    #[default]
    DecisionTreeC45,
    RandomForest,
    Svm,
}

impl ModelName {
    /// Selector order.
    pub const ALL: [ModelName; 3] = [
        ModelName::DecisionTreeC45,
        ModelName::RandomForest,
        ModelName::Svm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModelName::DecisionTreeC45 => "Decision Tree C4.5",
            ModelName::RandomForest => "Random Forest",
            ModelName::Svm => "SVM",
        }
    }

    pub fn metrics(self) -> &'static ModelMetrics {
        let idx = match self {
            ModelName::DecisionTreeC45 => 0,
            ModelName::RandomForest => 1,
            ModelName::Svm => 2,
        };
        &MODEL_METRICS[idx]
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelName {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelName::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| MetricsError::UnknownModel(s.to_string()))
    }
}

/// Binary confusion matrix laid out as `[[TN, FP], [FN, TP]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: u32,
    pub false_positive: u32,
    pub false_negative: u32,
    pub true_positive: u32,
}

impl ConfusionMatrix {
    pub const fn new(grid: [[u32; 2]; 2]) -> Self {
        ConfusionMatrix {
            true_negative: grid[0][0],
            false_positive: grid[0][1],
            false_negative: grid[1][0],
            true_positive: grid[1][1],
        }
    }

    /// Rows are actual class, columns predicted class.
    pub fn grid(&self) -> [[u32; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn total(&self) -> u32 {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Accuracy implied by the matrix itself.
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: u32, denom: u32) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// Reported accuracy and confusion matrix for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub model: ModelName,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Literal evaluation results, in selector order.
pub static MODEL_METRICS: [ModelMetrics; 3] = [
    ModelMetrics {
        model: ModelName::DecisionTreeC45,
        accuracy: 0.9499,
        confusion: ConfusionMatrix::new([[321, 4], [20, 134]]),
    },
    ModelMetrics {
        model: ModelName::RandomForest,
        accuracy: 0.9520,
        confusion: ConfusionMatrix::new([[321, 4], [19, 135]]),
    },
    ModelMetrics {
        model: ModelName::Svm,
        accuracy: 0.9290,
        confusion: ConfusionMatrix::new([[310, 15], [19, 135]]),
    },
];

/// Look up the metrics for a model by its display name.
pub fn lookup(name: &str) -> Result<&'static ModelMetrics, MetricsError> {
    let model: ModelName = name.parse()?;
    Ok(model.metrics())
}
