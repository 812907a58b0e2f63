use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use mlp_live::{Activation, Network, NetworkConfig};

struct CountingAlloc {
    allocs: AtomicUsize,
    reallocs: AtomicUsize,
}

impl CountingAlloc {
    const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            reallocs: AtomicUsize::new(0),
        }
    }

    fn reset(&self) {
        self.allocs.store(0, Ordering::Relaxed);
        self.reallocs.store(0, Ordering::Relaxed);
    }

    fn alloc_events(&self) -> usize {
        self.allocs.load(Ordering::Relaxed) + self.reallocs.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.reallocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc::new();

// Single test in this binary: the counter is process-wide.
#[test]
fn forward_and_train_step_do_not_allocate() {
    let mut net = Network::with_seed(
        NetworkConfig {
            learning_rate: 0.05,
            hidden_activation: Activation::Tanh,
            output_activation: Activation::Sigmoid,
            input_nodes: 16,
            hidden_nodes: 32,
            output_nodes: 4,
        },
        0,
    );
    let input = vec![0.25_f32; 16];
    let short_target = [1.0_f32, 0.0];

    ALLOC.reset();
    for _ in 0..500 {
        net.forward(&input);
        net.train_step(&input, &short_target);
    }
    let events = ALLOC.alloc_events();

    assert_eq!(events, 0, "expected no allocations per step, saw {events}");
    assert_eq!(net.iteration(), 500);
}
