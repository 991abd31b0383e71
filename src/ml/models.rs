//! Regressor implementations for the rain model.
//!
//! Regressors see scaled features and answer in `log(1 + mm)` space.

use super::{schema, FeatureVector, FEATURE_COUNT};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Trait for rain regressors
pub trait Regressor: Send + Sync {
    /// Predict `log(1 + mm)` from a scaled feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Short model family name, for logs and health output.
    fn kind(&self) -> &'static str;
}

/// Linear model: `intercept + Σ coefficient·x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            anyhow::bail!(
                "Feature count mismatch: expected {} coefficients, got {}",
                FEATURE_COUNT,
                self.coefficients.len()
            );
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.coefficients.len(),
                features.len()
            );
        }

        Ok(features
            .as_slice()
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Node of a flattened decision tree. A sample goes to `left` when
/// `x[feature] < threshold`, otherwise to `right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Decision tree stored as a node array rooted at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, tree_index: usize) -> Result<()> {
        if self.nodes.is_empty() {
            anyhow::bail!("Tree {} has no nodes", tree_index);
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    anyhow::bail!("Tree {} node {} splits on unknown feature {}", tree_index, i, feature);
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    anyhow::bail!("Tree {} node {} points outside the tree", tree_index, i);
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `x`. A walk longer than the node count means the
    /// tree has a cycle.
    pub fn evaluate(&self, x: &[f64]) -> Result<f64> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x
                        .get(*feature)
                        .ok_or_else(|| anyhow::anyhow!("Missing feature {}", feature))?;
                    idx = if *v < *threshold { *left } else { *right };
                }
                None => anyhow::bail!("Node {} out of range", idx),
            }
        }
        anyhow::bail!("Tree walk did not reach a leaf")
    }
}

/// Gradient-boosted tree ensemble: `base_score + Σ tree(x)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleRegressor {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<DecisionTree>,
}

impl TreeEnsembleRegressor {
    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            anyhow::bail!("Tree ensemble has no trees");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let x = features.as_slice();
        self.trees
            .iter()
            .try_fold(self.base_score, |acc, tree| Ok::<_, anyhow::Error>(acc + tree.evaluate(x)?))
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}

/// Regressor artifact as exported from training, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsembleRegressor),
}

impl RegressorArtifact {
    /// Check shape and recorded column order, then hand out the model.
    pub fn into_regressor(self) -> Result<Box<dyn Regressor>> {
        let names = match &self {
            RegressorArtifact::Linear(m) => m.feature_names.as_ref(),
            RegressorArtifact::TreeEnsemble(m) => m.feature_names.as_ref(),
        };
        if let Some(names) = names {
            schema::check_column_names(names)?;
        }

        Ok(match self {
            RegressorArtifact::Linear(m) => {
                m.validate()?;
                Box::new(m)
            }
            RegressorArtifact::TreeEnsemble(m) => {
                m.validate()?;
                Box::new(m)
            }
        })
    }
}
