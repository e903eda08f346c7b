use crate::models::Message;

/// Maximum number of messages per bulk-insert batch.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// An export message tagged with the origin id of the channel whose
/// directory it was found under.
#[derive(Debug, Clone)]
pub struct TaggedMessage {
    pub channel_id: String,
    pub message: Message,
}

/// Accumulates tagged messages into fixed-maximum batches.
///
/// Many parse tasks push into one batcher behind a mutex; completed batches
/// are sealed as soon as the maximum is reached, and the trailing partial
/// batch is flushed only when the batcher is consumed. An empty trailing
/// batch is never emitted.
#[derive(Debug)]
pub struct MessageBatcher {
    max_batch_size: usize,
    completed: Vec<Vec<TaggedMessage>>,
    current: Vec<TaggedMessage>,
}

impl MessageBatcher {
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            max_batch_size,
            completed: Vec::new(),
            current: Vec::new(),
        }
    }

    pub fn push(&mut self, message: TaggedMessage) {
        self.current.push(message);
        if self.current.len() >= self.max_batch_size {
            self.completed.push(std::mem::take(&mut self.current));
        }
    }

    /// Total messages accumulated so far.
    pub fn len(&self) -> usize {
        self.completed.iter().map(Vec::len).sum::<usize>() + self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seal the remainder and hand back all batches, oldest first.
    pub fn take_batches(&mut self) -> Vec<Vec<TaggedMessage>> {
        if !self.current.is_empty() {
            self.completed.push(std::mem::take(&mut self.current));
        }
        std::mem::take(&mut self.completed)
    }
}

impl Default for MessageBatcher {
    fn default() -> Self {
        Self::new(MAX_BATCH_SIZE)
    }
}
