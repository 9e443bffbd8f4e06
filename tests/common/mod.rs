#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Counts how many times the closures it hands out have run.
#[derive(Clone, Default)]
pub struct Counter(Rc<Cell<usize>>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn tick(&self) -> impl FnOnce() + Clone + 'static {
        let counter = self.clone();
        move || counter.hit()
    }
}
