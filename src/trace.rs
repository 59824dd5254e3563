//! Chrome trace output.
//!
//! Spans from every thread land in one file, each thread on its own track,
//! so overlapping waits and short submissions are visible at a glance.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static TRACE: Mutex<Option<Trace>> = Mutex::new(None);
/// Mirrors TRACE.is_some(), so untraced runs never touch the lock.
static ENABLED: AtomicBool = AtomicBool::new(false);
static NEXT_TID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static TID: usize = NEXT_TID.fetch_add(1, Ordering::Relaxed);
}

struct Event {
    name: &'static str,
    tid: usize,
    start: Instant,
    end: Instant,
}

struct Trace {
    start: Instant,
    w: BufWriter<File>,
    /// The first failed span write, reported by close().
    error: Option<std::io::Error>,
}

impl Trace {
    fn new(path: &str) -> std::io::Result<Self> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "[")?;
        Ok(Trace {
            start: Instant::now(),
            w,
            error: None,
        })
    }

    fn write_event(&mut self, event: &Event) -> std::io::Result<()> {
        write!(
            self.w,
            "{{ \"pid\": 0, \"tid\": {}, \"name\": {:?}, \"ts\": {}, \"ph\": \"X\", \"dur\": {} }}",
            event.tid,
            event.name,
            event.start.duration_since(self.start).as_micros(),
            event.end.duration_since(event.start).as_micros(),
        )
    }

    fn write(&mut self, event: &Event) -> std::io::Result<()> {
        self.write_event(event)?;
        writeln!(self.w, ",")
    }

    fn close(&mut self) -> std::io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.write_event(&Event {
            name: "main",
            tid: 0,
            start: self.start,
            end: Instant::now(),
        })?;
        writeln!(self.w, "]")?;
        self.w.flush()
    }
}

fn lock() -> MutexGuard<'static, Option<Trace>> {
    TRACE.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn open(path: &str) -> std::io::Result<()> {
    let trace = Trace::new(path)?;
    *lock() = Some(trace);
    ENABLED.store(true, Ordering::Release);
    Ok(())
}

/// Runs f, recording it as a span named `name` on the calling thread's track.
#[inline]
pub fn scope<T>(name: &'static str, f: impl FnOnce() -> T) -> T {
    if !ENABLED.load(Ordering::Acquire) {
        return f();
    }
    let start = Instant::now();
    let result = f();
    let event = Event {
        name,
        tid: TID.with(|tid| *tid),
        start,
        end: Instant::now(),
    };
    if let Some(trace) = lock().as_mut() {
        if let Err(err) = trace.write(&event) {
            trace.error.get_or_insert(err);
        }
    }
    result
}

pub fn close() -> std::io::Result<()> {
    ENABLED.store(false, Ordering::Release);
    if let Some(mut trace) = lock().take() {
        return trace.close();
    }
    Ok(())
}
