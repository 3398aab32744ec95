use std::hint::black_box;

/// Content of a [Sink]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Held {
    /// Nothing has been stored yet, or the sink was cleared
    #[default]
    Empty,
    /// An owning pointer to a heap-allocated integer
    Reference(Box<i32>),
    /// An integer copied in by value
    Value(i32),
}

/// Storage used to keep a produced value observable after its producer returns
///
/// Every write goes through [black_box], so the optimiser has to assume the stored
/// content is read later and cannot drop the computation that produced it.
/// Only the most recent write is kept; storing again drops the previous content.
#[derive(Debug, Clone, Default)]
pub struct Sink {
    held: Held,
    writes: u64,
}

impl Sink {
    pub fn new() -> Self {
        Sink {
            held: Held::Empty,
            writes: 0,
        }
    }

    /// Store a heap pointer, keeping the pointed-to integer alive past the producing call
    pub fn store_reference(&mut self, reference: Box<i32>) {
        self.held = black_box(Held::Reference(reference));
        self.writes += 1;
    }

    /// Store a copied integer
    pub fn store_value(&mut self, value: i32) {
        self.held = black_box(Held::Value(value));
        self.writes += 1;
    }

    pub fn held(&self) -> &Held {
        &self.held
    }

    /// The integer currently observable through the sink, following the pointer if needed
    pub fn value(&self) -> Option<i32> {
        match &self.held {
            Held::Empty => None,
            Held::Reference(reference) => Some(**reference),
            Held::Value(value) => Some(*value),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.held, Held::Reference(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.held, Held::Empty)
    }

    /// Number of stores made since the sink was created
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Drop the current content. The write counter is left as is.
    pub fn clear(&mut self) {
        self.held = Held::Empty;
    }
}
