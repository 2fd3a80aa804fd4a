/// Fixed-size block processor for the capture path.
///
/// Device callbacks deliver arbitrary chunk sizes; this regroups them into
/// blocks of exactly `block_size` samples, in capture order. A partial block
/// is held until it fills.
#[derive(Debug)]
pub struct BlockProcessor {
    block_size: usize,
    pending: Vec<f32>,
}

impl BlockProcessor {
    pub fn new(block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be positive");
        Self {
            block_size,
            pending: Vec::with_capacity(block_size),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Feeds samples and calls `on_block` once per completed block.
    pub fn push<F>(&mut self, mut samples: &[f32], mut on_block: F)
    where
        F: FnMut(Vec<f32>),
    {
        while !samples.is_empty() {
            let room = self.block_size - self.pending.len();
            let take = room.min(samples.len());
            self.pending.extend_from_slice(&samples[..take]);
            samples = &samples[take..];
            if self.pending.len() == self.block_size {
                let block = std::mem::replace(&mut self.pending, Vec::with_capacity(self.block_size));
                on_block(block);
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
