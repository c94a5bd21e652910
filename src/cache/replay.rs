use std::sync::Arc;

use crate::store::Store;
use crate::types::CacheError;

/// Renders the recorded call history of an instrumented method: a one-line
/// summary, then one line per call pairing the i-th input with the i-th
/// output, in recording order. `NotFound` if the method has no counter
/// (never called, or the store was flushed since).
pub async fn replay(
    store: &Arc<dyn Store + Send + Sync>,
    qualname: &str,
) -> Result<String, CacheError> {
    let count = match store.get(qualname).await? {
        Some(raw) => String::from_utf8_lossy(&raw).into_owned(),
        None => {
            return Err(CacheError::NotFound {
                method: qualname.to_string(),
            })
        }
    };
    let inputs = store.lrange(&format!("{}:inputs", qualname), 0, -1).await?;
    let outputs = store.lrange(&format!("{}:outputs", qualname), 0, -1).await?;

    let mut out = format!("{} was called {} times:\n", qualname, count);
    for (input, output) in inputs.iter().zip(outputs.iter()) {
        out.push_str(&format!(
            "{}(*{}) -> {}\n",
            qualname,
            String::from_utf8_lossy(input),
            String::from_utf8_lossy(output)
        ));
    }
    Ok(out)
}
