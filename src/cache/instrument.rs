use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::store::Store;
use crate::types::CacheError;

/// One telemetry layer around a cached method. The method identifier is
/// fixed at construction; layers never inspect the call itself, only its
/// textual input and output forms.
#[async_trait]
pub trait Instrument: Send + Sync {
    async fn on_call(&self, input: &str) -> Result<(), CacheError>;
    async fn on_return(&self, output: &str) -> Result<(), CacheError>;
}

/// Increments the counter at `<qualname>` on every call attempt, before the
/// wrapped body runs. Failed calls still count.
pub struct CallCounter {
    store: Arc<dyn Store + Send + Sync>,
    qualname: String,
}

impl CallCounter {
    pub fn new(store: Arc<dyn Store + Send + Sync>, qualname: &str) -> Self {
        Self {
            store,
            qualname: qualname.to_string(),
        }
    }
}

#[async_trait]
impl Instrument for CallCounter {
    async fn on_call(&self, _input: &str) -> Result<(), CacheError> {
        let count = self.store.incr(&self.qualname).await?;
        debug!("{} call #{}", self.qualname, count);
        Ok(())
    }

    async fn on_return(&self, _output: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Appends input and output reprs to `<qualname>:inputs` and
/// `<qualname>:outputs`. The i-th input pairs with the i-th output.
pub struct HistoryRecorder {
    store: Arc<dyn Store + Send + Sync>,
    qualname: String,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn Store + Send + Sync>, qualname: &str) -> Self {
        Self {
            store,
            qualname: qualname.to_string(),
        }
    }
}

#[async_trait]
impl Instrument for HistoryRecorder {
    async fn on_call(&self, input: &str) -> Result<(), CacheError> {
        let key = format!("{}:inputs", self.qualname);
        self.store.rpush(&key, input.as_bytes()).await?;
        Ok(())
    }

    async fn on_return(&self, output: &str) -> Result<(), CacheError> {
        let key = format!("{}:outputs", self.qualname);
        self.store.rpush(&key, output.as_bytes()).await?;
        Ok(())
    }
}

/// A method wrapped by a chain of `Instrument` layers. `enter` runs every
/// `on_call` in order before the body, `exit` every `on_return` after it.
pub struct InstrumentedMethod {
    layers: Vec<Arc<dyn Instrument>>,
}

impl InstrumentedMethod {
    /// The standard chain: call counter first, then history recorder.
    pub fn new(store: Arc<dyn Store + Send + Sync>, qualname: &str) -> Self {
        let layers: Vec<Arc<dyn Instrument>> = vec![
            Arc::new(CallCounter::new(store.clone(), qualname)),
            Arc::new(HistoryRecorder::new(store, qualname)),
        ];
        Self::with_layers(layers)
    }

    pub fn with_layers(layers: Vec<Arc<dyn Instrument>>) -> Self {
        Self { layers }
    }

    pub async fn enter(&self, input: &str) -> Result<(), CacheError> {
        for layer in &self.layers {
            layer.on_call(input).await?;
        }
        Ok(())
    }

    pub async fn exit(&self, output: &str) -> Result<(), CacheError> {
        for layer in &self.layers {
            layer.on_return(output).await?;
        }
        Ok(())
    }
}
