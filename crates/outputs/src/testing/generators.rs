//! Proptest strategies for output payloads and operation sequences.

use proptest::prelude::*;

use crate::models::{NewOutput, OutputType};

/// One step of a randomized output workload.
#[derive(Debug, Clone)]
pub enum OutputOperation {
    /// Create an output under one of a small set of names.
    Create {
        name_index: usize,
        is_default: bool,
        is_default_monitoring: bool,
    },
    /// Set a default flag on a previously created output.
    MakeDefault { name_index: usize, monitoring: bool },
    /// Try to delete a previously created output.
    Delete { name_index: usize },
}

/// Names used by generated operations.
pub const OUTPUT_NAMES: &[&str] = &["alpha", "bravo", "charlie", "delta"];

/// Strategy for an Elasticsearch payload with the given default flags.
pub fn new_output_strategy() -> impl Strategy<Value = NewOutput> {
    (
        "[a-z]{1,12}",
        prop::collection::vec("[a-z]{1,8}", 1..3),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, hosts, is_default, is_default_monitoring)| NewOutput {
            is_default,
            is_default_monitoring,
            ..NewOutput::new(
                name,
                OutputType::Elasticsearch,
                hosts
                    .into_iter()
                    .map(|h| format!("https://{h}.example.com"))
                    .collect(),
            )
        })
}

/// Strategy for a single operation.
pub fn operation_strategy() -> impl Strategy<Value = OutputOperation> {
    let index = 0..OUTPUT_NAMES.len();
    prop_oneof![
        (index.clone(), any::<bool>(), any::<bool>()).prop_map(
            |(name_index, is_default, is_default_monitoring)| OutputOperation::Create {
                name_index,
                is_default,
                is_default_monitoring,
            }
        ),
        (index.clone(), any::<bool>())
            .prop_map(|(name_index, monitoring)| OutputOperation::MakeDefault {
                name_index,
                monitoring
            }),
        index.prop_map(|name_index| OutputOperation::Delete { name_index }),
    ]
}

/// Strategy for a sequence of operations.
pub fn operation_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<OutputOperation>> {
    prop::collection::vec(operation_strategy(), 1..=max_len)
}
