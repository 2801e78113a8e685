use crate::connectors::{sink::Sink, source::Source};
use std::sync::Arc;

/// Handles shared by every dataset sync of a process: built once at
/// startup and passed by reference.
#[derive(Clone)]
pub struct SyncContext {
    pub source: Arc<dyn Source>,
    pub sink: Arc<dyn Sink>,
}

impl SyncContext {
    pub fn new(source: Arc<dyn Source>, sink: Arc<dyn Sink>) -> Self {
        SyncContext { source, sink }
    }
}
