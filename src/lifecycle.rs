/// Allocation state of a generator's buffers.
///
/// Starts uninitialized; buffers are sized from the first accepted frame and
/// kept for the life of the generator, so the move to ready happens exactly
/// once and is never undone.
#[derive(Debug)]
pub(crate) struct Lifecycle<T> {
    ready: Option<T>,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self { ready: None }
    }
}

impl<T> Lifecycle<T> {
    /// The buffers, once allocated.
    pub fn get(&self) -> Option<&T> {
        self.ready.as_ref()
    }

    /// Runs `init` on the first call only.
    pub fn get_or_init(&mut self, init: impl FnOnce() -> T) -> &mut T {
        self.ready.get_or_insert_with(init)
    }
}
