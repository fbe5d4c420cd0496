//! Log output that shares the terminal with an indicatif spinner.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

/// `MakeWriter` for the fmt layer. While a bar is attached, every log line is
/// written inside [`ProgressBar::suspend`] so it never lands mid-redraw.
#[derive(Clone)]
pub struct ProgressLog<M> {
    inner: M,
    active: Arc<Mutex<Option<ProgressBar>>>,
}

impl<M> ProgressLog<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn attach(&self, bar: &ProgressBar) {
        if let Ok(mut active) = self.active.lock() {
            *active = Some(bar.clone());
        }
    }

    pub fn detach(&self) {
        if let Ok(mut active) = self.active.lock() {
            *active = None;
        }
    }

    fn current(&self) -> Option<ProgressBar> {
        self.active.lock().ok().and_then(|active| (*active).clone())
    }
}

pub struct SuspendedWriter<W> {
    inner: W,
    bar: Option<ProgressBar>,
}

impl<W: Write> Write for SuspendedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.bar {
            Some(bar) => bar.suspend(|| self.inner.write(buf)),
            None => self.inner.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match &self.bar {
            Some(bar) => bar.suspend(|| self.inner.write_all(buf)),
            None => self.inner.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for ProgressLog<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SuspendedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWriter {
            inner: self.inner.make_writer(),
            bar: self.current(),
        }
    }
}
