//! Decision-tree traversal for the symptom questionnaire.
//!
//! The tree is stored in the parallel-array layout scikit-learn exports:
//! `feature[i]` is the split feature at node `i` (`-1` at leaves),
//! `children_left[i]` / `children_right[i]` hold child node ids (`-1` at
//! leaves) and `value[i]` the per-class training-sample counts. Traversal is
//! the pure [`step`] function; nothing here holds mutable state between
//! requests.

use serde::Deserialize;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("node {node} is out of bounds (tree has {n_nodes} nodes)")]
    NodeOutOfBounds { node: usize, n_nodes: usize },

    #[error("node {0} is a leaf and accepts no further answers")]
    AnswerAtLeaf(usize),

    #[error("malformed tree at node {node}: {reason}")]
    Malformed { node: usize, reason: String },
}

impl From<TreeError> for AppError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NodeOutOfBounds { .. } => AppError::NotFound(err.into()),
            TreeError::AnswerAtLeaf(_) => AppError::BadRequest(err.into()),
            TreeError::Malformed { .. } => AppError::InternalError(err.into()),
        }
    }
}

/// Yes/no answer to a symptom question.
///
/// `No` follows the left child, matching a scikit-learn `x <= 0.5` split on
/// a 0/1 symptom feature; `Yes` follows the right child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    No,
    Yes,
}

impl Answer {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Answer::No),
            1 => Some(Answer::Yes),
            _ => None,
        }
    }
}

/// A trained decision tree in scikit-learn's parallel-array layout.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn n_nodes(&self) -> usize {
        self.feature.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] < 0 && self.children_right[node] < 0
    }

    fn check_bounds(&self, node: usize) -> Result<(), TreeError> {
        if node >= self.n_nodes() {
            return Err(TreeError::NodeOutOfBounds {
                node,
                n_nodes: self.n_nodes(),
            });
        }
        Ok(())
    }

    /// Child reached from `node` by the given answer.
    pub fn child(&self, node: usize, answer: Answer) -> Result<usize, TreeError> {
        self.check_bounds(node)?;
        if self.is_leaf(node) {
            return Err(TreeError::AnswerAtLeaf(node));
        }
        let child = match answer {
            Answer::No => self.children_left[node],
            Answer::Yes => self.children_right[node],
        };
        Ok(child as usize)
    }

    /// Structural validation run once at artifact load. After this passes,
    /// traversal never indexes out of bounds and never cycles.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), TreeError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeError::Malformed {
                node: 0,
                reason: "tree has no nodes".to_string(),
            });
        }
        for (name, len) in [
            ("threshold", self.threshold.len()),
            ("children_left", self.children_left.len()),
            ("children_right", self.children_right.len()),
            ("value", self.value.len()),
        ] {
            if len != n_nodes {
                return Err(TreeError::Malformed {
                    node: 0,
                    reason: format!("{} has {} entries, expected {}", name, len, n_nodes),
                });
            }
        }

        for node in 0..n_nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];
            let feature = self.feature[node];

            if left < 0 || right < 0 {
                if left != right {
                    return Err(TreeError::Malformed {
                        node,
                        reason: "leaf must have neither child".to_string(),
                    });
                }
                if feature >= 0 {
                    return Err(TreeError::Malformed {
                        node,
                        reason: "leaf must not carry a split feature".to_string(),
                    });
                }
                // A leaf with no samples would rank no diagnoses at all.
                if self.value[node].iter().sum::<f64>() <= 0.0 {
                    return Err(TreeError::Malformed {
                        node,
                        reason: "leaf has no training samples".to_string(),
                    });
                }
            } else {
                if feature < 0 || feature as usize >= n_features {
                    return Err(TreeError::Malformed {
                        node,
                        reason: format!("split feature {} outside feature list", feature),
                    });
                }
                // Children strictly after the parent keeps the tree acyclic.
                for child in [left, right] {
                    if child as usize >= n_nodes || child <= node as i64 {
                        return Err(TreeError::Malformed {
                            node,
                            reason: format!("child {} out of order", child),
                        });
                    }
                }
            }

            if self.value[node].len() != n_classes {
                return Err(TreeError::Malformed {
                    node,
                    reason: format!(
                        "value row has {} entries, expected {} classes",
                        self.value[node].len(),
                        n_classes
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Candidate diagnosis at a leaf; `confidence` is the share of the leaf's
/// training samples belonging to this class, rendered as a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub disease: String,
    pub confidence: String,
}

/// Outcome of one questionnaire step.
#[derive(Debug, PartialEq)]
pub enum Step {
    Question { node_id: usize, feature: String },
    Final { results: Vec<Prediction> },
}

/// Advance the questionnaire by at most one edge and report what comes next.
///
/// Pure function of its inputs: the same `(node_id, answer)` pair always
/// yields the same step. Requires a tree that passed
/// [`DecisionTree::validate`] against `feature_names` / `classes`.
pub fn step(
    tree: &DecisionTree,
    feature_names: &[String],
    classes: &[String],
    node_id: usize,
    answer: Option<Answer>,
) -> Result<Step, TreeError> {
    tree.check_bounds(node_id)?;

    let node = match answer {
        Some(answer) => tree.child(node_id, answer)?,
        None => node_id,
    };

    if tree.is_leaf(node) {
        return Ok(Step::Final {
            results: ranked_results(tree, classes, node),
        });
    }

    let idx = tree.feature[node] as usize;
    let feature = feature_names
        .get(idx)
        .cloned()
        .ok_or_else(|| TreeError::Malformed {
            node,
            reason: format!("split feature {} outside feature list", idx),
        })?;

    Ok(Step::Question {
        node_id: node,
        feature,
    })
}

/// Classes present at the leaf, ranked by descending sample count. Ties keep
/// class-index order; zero-count classes are omitted.
fn ranked_results(tree: &DecisionTree, classes: &[String], leaf: usize) -> Vec<Prediction> {
    let counts = &tree.value[leaf];
    let total: f64 = counts.iter().sum();

    let mut ranked: Vec<(usize, f64)> = counts
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, count)| *count > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .map(|(idx, count)| Prediction {
            disease: classes[idx].clone(),
            confidence: format!("{:.1}%", count / total * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> Vec<String> {
        ["fever", "cough", "skin_rash"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn classes() -> Vec<String> {
        ["Common Cold", "Influenza", "Measles"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    // root splits on fever; no -> leaf 1, yes -> split on skin_rash at node 2
    fn tree() -> DecisionTree {
        DecisionTree {
            feature: vec![0, -1, 2, -1, -1],
            threshold: vec![0.5, 0.0, 0.5, 0.0, 0.0],
            children_left: vec![1, -1, 3, -1, -1],
            children_right: vec![2, -1, 4, -1, -1],
            value: vec![
                vec![10.0, 12.0, 8.0],
                vec![9.0, 1.0, 0.0],
                vec![1.0, 11.0, 8.0],
                vec![1.0, 11.0, 0.0],
                vec![0.0, 0.0, 8.0],
            ],
        }
    }

    #[test]
    fn validate_accepts_well_formed_tree() {
        assert!(tree().validate(3, 3).is_ok());
    }

    #[test]
    fn validate_rejects_child_before_parent() {
        let mut t = tree();
        t.children_left[2] = 0;
        assert!(matches!(
            t.validate(3, 3),
            Err(TreeError::Malformed { node: 2, .. })
        ));
    }

    #[test]
    fn validate_rejects_feature_outside_list() {
        assert!(matches!(
            tree().validate(1, 3),
            Err(TreeError::Malformed { .. })
        ));
    }

    #[test]
    fn validate_rejects_leaf_with_one_child() {
        let mut t = tree();
        t.children_right[2] = -1;
        assert!(matches!(
            t.validate(3, 3),
            Err(TreeError::Malformed { node: 2, .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_count_leaf() {
        let mut t = tree();
        t.value[4] = vec![0.0, 0.0, 0.0];
        assert!(matches!(
            t.validate(3, 3),
            Err(TreeError::Malformed { node: 4, .. })
        ));
    }

    #[test]
    fn validate_rejects_short_value_row() {
        assert!(matches!(
            tree().validate(3, 2),
            Err(TreeError::Malformed { .. })
        ));
    }

    #[test]
    fn root_without_answer_asks_root_question() {
        let step = step(&tree(), &features(), &classes(), 0, None).unwrap();
        assert_eq!(
            step,
            Step::Question {
                node_id: 0,
                feature: "fever".to_string()
            }
        );
    }

    #[test]
    fn yes_at_root_advances_to_right_child() {
        let step = step(&tree(), &features(), &classes(), 0, Some(Answer::Yes)).unwrap();
        assert_eq!(
            step,
            Step::Question {
                node_id: 2,
                feature: "skin_rash".to_string()
            }
        );
    }

    #[test]
    fn no_at_root_reaches_a_leaf() {
        let step = step(&tree(), &features(), &classes(), 0, Some(Answer::No)).unwrap();
        match step {
            Step::Final { results } => {
                assert_eq!(results[0].disease, "Common Cold");
                assert_eq!(results[0].confidence, "90.0%");
                // zero-count Measles is omitted
                assert_eq!(results.len(), 2);
            }
            other => panic!("expected final step, got {:?}", other),
        }
    }

    #[test]
    fn results_are_ranked_descending() {
        let step = step(&tree(), &features(), &classes(), 2, Some(Answer::No)).unwrap();
        match step {
            Step::Final { results } => {
                let diseases: Vec<_> = results.iter().map(|r| r.disease.as_str()).collect();
                assert_eq!(diseases, ["Influenza", "Common Cold"]);
                assert_eq!(results[0].confidence, "91.7%");
                assert_eq!(results[1].confidence, "8.3%");
            }
            other => panic!("expected final step, got {:?}", other),
        }
    }

    #[test]
    fn step_is_pure() {
        let t = tree();
        let a = step(&t, &features(), &classes(), 0, Some(Answer::Yes)).unwrap();
        let b = step(&t, &features(), &classes(), 0, Some(Answer::Yes)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_bounds_node_is_rejected() {
        assert!(matches!(
            step(&tree(), &features(), &classes(), 99, None),
            Err(TreeError::NodeOutOfBounds { node: 99, .. })
        ));
    }

    #[test]
    fn answering_at_a_leaf_is_rejected() {
        assert!(matches!(
            step(&tree(), &features(), &classes(), 1, Some(Answer::Yes)),
            Err(TreeError::AnswerAtLeaf(1))
        ));
    }

    #[test]
    fn answer_codes_outside_binary_domain_are_rejected() {
        assert_eq!(Answer::from_code(0), Some(Answer::No));
        assert_eq!(Answer::from_code(1), Some(Answer::Yes));
        assert_eq!(Answer::from_code(2), None);
    }
}
