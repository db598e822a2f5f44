// A failed parse must release every node it built before failing.
//
// Live heap bytes are counted per thread by a wrapping allocator, so the
// test harness's own threads do not disturb the measurement.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use neo_frontend::{DiagnosticCollector, parse_source};

struct CountingAlloc;

thread_local! {
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn adjust(delta: isize) {
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            adjust(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        adjust(-(layout.size() as isize));
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live_bytes() -> isize {
    LIVE_BYTES.with(Cell::get)
}

/// Sources that fail deep inside a production, after building nodes.
const FAILING: &[&str] = &[
    "module m { class A : B {
        field f : int { get, set } = 1;
        fun run(x : int) int { var y = x * 2 + 1; while (y > 0) { y -= 1; } return y; }
        dtor() { }
        dtor() { }
    } }",
    "fun f() { if (a) { b = c + (d * e); } else { g(1, 2, 3 = 4); } }",
    "import a.b; enum E { A = 1, B = 2, C = } var x = 1;",
];

#[test]
fn failed_parses_release_partial_nodes() {
    for source in FAILING {
        // Warm up lazily initialized state (tracing callsites and the like).
        let mut diag = DiagnosticCollector::new();
        assert!(parse_source(source, None, &mut diag).is_none());
        drop(diag);

        let before = live_bytes();
        {
            let mut diag = DiagnosticCollector::new();
            let parsed = parse_source(source, None, &mut diag);
            assert!(parsed.is_none());
            assert!(diag.has_error());
        }
        let after = live_bytes();
        assert_eq!(before, after, "leaked {} bytes parsing {source:?}", after - before);
    }
}
