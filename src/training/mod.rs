//! Model training module
//!
//! Tree ensemble used for the risk classifier:
//! - Gini decision trees over random feature subsets
//! - A Random Forest of bootstrapped trees

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeNode};
pub use random_forest::RandomForest;
