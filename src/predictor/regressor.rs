//! Regressor - pre-trained model evaluation
//!
//! Models are exported from training as JSON and tagged by `"type"`.
//! Tree arrays follow the usual flat layout: node `i` is a leaf when
//! `children_left[i] == -1`, otherwise it splits on `feature[i]` and goes
//! left when `x <= threshold[i]`.

use serde::{Deserialize, Serialize};

use super::artifacts::ArtifactError;

// ============================================================================
// REGRESSOR TRAIT
// ============================================================================

/// Anything that maps one feature row to one scalar.
/// Implementations are immutable after load and shared across requests.
pub trait Regressor: Send + Sync {
    /// Minimum row width the model reads
    fn n_features(&self) -> usize;

    fn predict_row(&self, row: &[f64]) -> f64;
}

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Model {
    Linear(LinearRegressor),
    RandomForest(ForestRegressor),
}

impl Model {
    /// Structural checks plus compatibility with a layout of `width` columns
    pub fn validate(&self, width: usize) -> Result<(), ArtifactError> {
        match self {
            Model::Linear(m) => {
                if m.coefficients.len() != width {
                    return Err(ArtifactError::invalid(
                        "model",
                        format!(
                            "linear model has {} coefficients, train columns have {}",
                            m.coefficients.len(),
                            width
                        ),
                    ));
                }
                if !m.intercept.is_finite() || m.coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::invalid("model", "non-finite coefficient"));
                }
            }
            Model::RandomForest(f) => {
                if f.trees.is_empty() {
                    return Err(ArtifactError::invalid("model", "forest has no trees"));
                }
                for (i, tree) in f.trees.iter().enumerate() {
                    tree.validate()
                        .map_err(|reason| ArtifactError::invalid("model", format!("tree {}: {}", i, reason)))?;
                }
                if f.n_features() > width {
                    return Err(ArtifactError::invalid(
                        "model",
                        format!(
                            "forest splits on feature {} but train columns have {}",
                            f.n_features() - 1,
                            width
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Model::Linear(_) => "linear",
            Model::RandomForest(_) => "random_forest",
        }
    }

    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            Model::Linear(m) => Box::new(m),
            Model::RandomForest(f) => Box::new(f),
        }
    }
}

// ============================================================================
// LINEAR
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

// ============================================================================
// RANDOM FOREST
// ============================================================================

/// Averaging ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub trees: Vec<DecisionTree>,
}

impl Regressor for ForestRegressor {
    fn n_features(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_features).max().unwrap_or(0)
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        sum / self.trees.len() as f64
    }
}

const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    fn validate(&self) -> Result<(), String> {
        let n = self.value.len();
        if n == 0 {
            return Err("no nodes".into());
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays differ in length".into());
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(format!("node {} has only one child", i));
                }
                continue;
            }
            // children always come after their parent; rules out cycles
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", i, child));
                }
            }
            if self.feature[i] < 0 {
                return Err(format!("split node {} has negative feature index", i));
            }
        }
        Ok(())
    }

    fn n_features(&self) -> usize {
        self.children_left
            .iter()
            .zip(&self.feature)
            .filter(|&(&left, _)| left != LEAF)
            .map(|(_, &f)| f as usize + 1)
            .max()
            .unwrap_or(0)
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == LEAF {
                return self.value[node];
            }
            let x = row[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Stump on feature 0 at 0.0: left 10, right 20
    fn stump() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, -2.0, -2.0],
            value: vec![15.0, 10.0, 20.0],
        }
    }

    fn constant(v: f64) -> DecisionTree {
        DecisionTree {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![v],
        }
    }

    #[test]
    fn test_linear_predict() {
        let m = LinearRegressor {
            coefficients: vec![2.0, -1.0],
            intercept: 3.0,
        };
        assert_eq!(m.predict_row(&[1.0, 4.0]), 1.0);
        assert_eq!(m.n_features(), 2);
    }

    #[test]
    fn test_tree_split_is_inclusive_left() {
        let t = stump();
        assert_eq!(t.predict_row(&[-0.5]), 10.0);
        assert_eq!(t.predict_row(&[0.0]), 10.0);
        assert_eq!(t.predict_row(&[0.1]), 20.0);
        assert_eq!(t.n_features(), 1);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = ForestRegressor {
            trees: vec![stump(), constant(30.0)],
        };
        assert_eq!(forest.predict_row(&[1.0]), 25.0);
        assert_eq!(forest.predict_row(&[-1.0]), 20.0);
    }

    #[test]
    fn test_tree_validation() {
        assert!(stump().validate().is_ok());

        let mut cyclic = stump();
        cyclic.children_left[0] = 0;
        assert!(cyclic.validate().is_err());

        let mut short = stump();
        short.threshold.pop();
        assert!(short.validate().is_err());

        let mut one_child = stump();
        one_child.children_right[1] = 2;
        assert!(one_child.validate().is_err());
    }

    #[test]
    fn test_model_width_checks() {
        let linear = Model::Linear(LinearRegressor {
            coefficients: vec![1.0; 3],
            intercept: 0.0,
        });
        assert!(linear.validate(3).is_ok());
        assert!(linear.validate(4).is_err());

        let forest = Model::RandomForest(ForestRegressor { trees: vec![stump()] });
        assert!(forest.validate(5).is_ok());

        let empty = Model::RandomForest(ForestRegressor { trees: vec![] });
        assert!(empty.validate(5).is_err());
    }

    #[test]
    fn test_model_tagged_json() {
        let model: Model = serde_json::from_str(
            r#"{"type": "linear", "coefficients": [0.5, 0.25], "intercept": 1.0}"#,
        )
        .unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.into_regressor().predict_row(&[2.0, 4.0]), 3.0);

        let model: Model = serde_json::from_str(
            r#"{"type": "random_forest", "trees": [
                {"children_left": [-1], "children_right": [-1], "feature": [-2],
                 "threshold": [-2.0], "value": [12.5]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(model.kind(), "random_forest");
        assert_eq!(model.into_regressor().predict_row(&[]), 12.5);
    }
}
