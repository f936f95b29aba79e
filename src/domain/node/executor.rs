//! Per-item execution loop shared by every node

use std::future::Future;

use tracing::{debug, info, warn};

use super::host::ExecuteFunctions;
use super::item::{ItemError, ItemResult, NodeOutput, WorkflowItem};
use crate::domain::error::NodeError;

/// Run `operation` for every input item, one at a time and in input order.
///
/// A successful operation's result is merged into its item. A failure either
/// aborts the run with an error annotated with the item index, or, when the
/// host asks to continue on failure, appends an error item carrying the
/// pristine input json and moves on. Appended error items are not processed.
pub async fn run_per_item<F, Fut>(
    host: &dyn ExecuteFunctions,
    mut operation: F,
) -> Result<NodeOutput, NodeError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<ItemResult, NodeError>>,
{
    let node = host.node_name().to_string();
    let continue_on_fail = host.continue_on_fail();
    let mut items = host.input_items();
    let item_count = items.len();
    let mut failed = 0usize;

    debug!(node = %node, items = item_count, continue_on_fail, "Executing node");

    for item_index in 0..item_count {
        match operation(item_index).await {
            Ok(result) => {
                debug!(node = %node, item_index, key = result.key(), "Item processed");
                result.write_to(&mut items[item_index]);
            }
            Err(error) => {
                let error = error.at_item(node.as_str(), item_index);

                if !continue_on_fail {
                    debug!(node = %node, item_index, error = %error, "Aborting run");
                    return Err(error);
                }

                warn!(node = %node, item_index, error = %error, "Item failed, continuing");
                failed += 1;

                let original = host
                    .input_item(item_index)
                    .map(|item| item.json)
                    .unwrap_or_default();

                items.push(WorkflowItem::failed(
                    original,
                    ItemError::from(&error),
                    item_index,
                ));
            }
        }
    }

    info!(node = %node, items = item_count, failed, "Node run finished");

    Ok(vec![items])
}
