use std::{
    fmt::Write as _,
    fs::OpenOptions,
    io::{BufWriter, Write as _},
    path::PathBuf,
    sync::mpsc,
    thread::JoinHandle,
};

use cavernaut_engine::Movement;

/// One persisted observation, snapshotted at hand-off time.
///
/// The tick loop may mutate or clear its buffers before a write completes, so
/// rows own their data outright.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub features: Vec<f64>,
    pub label: Movement,
    pub good: bool,
}

/// Fire-and-forget destination for sampled rows.
///
/// Implementations must not block the tick loop; a lost row is never an
/// error the simulation sees.
pub trait SampleSink {
    fn submit(&self, row: SampleRow);
}

/// Formats a row as `f1,f2,...,fN,label,good`.
#[must_use]
pub fn format_row(row: &SampleRow) -> String {
    let mut line = String::with_capacity(row.features.len() * 4);
    for feature in &row.features {
        write!(&mut line, "{feature},").unwrap();
    }
    write!(&mut line, "{},{}", row.label.row_offset(), u8::from(row.good)).unwrap();
    line
}

/// Appends sampled rows to a CSV file from a single background worker.
///
/// The worker is a strict single-threaded FIFO, so the log stays append-only
/// and rows land in submission order. Write failures are logged to stderr and
/// swallowed. Dropping the writer closes the channel and joins the worker,
/// draining pending rows best-effort.
#[derive(Debug)]
pub struct CsvSampleWriter {
    sender: Option<mpsc::Sender<SampleRow>>,
    worker: Option<JoinHandle<()>>,
}

impl CsvSampleWriter {
    #[must_use]
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel::<SampleRow>();
        let worker = std::thread::spawn(move || write_rows(&path, &receiver));
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Drains pending rows and stops the worker.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for CsvSampleWriter {
    fn drop(&mut self) {
        self.close();
    }
}

impl SampleSink for CsvSampleWriter {
    fn submit(&self, row: SampleRow) {
        if let Some(sender) = &self.sender {
            // Send only fails when the worker is gone; the row is then lost,
            // which is acceptable for the training log.
            let _ = sender.send(row);
        }
    }
}

fn write_rows(path: &std::path::Path, receiver: &mpsc::Receiver<SampleRow>) {
    let file = match OpenOptions::new().append(true).create(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to open sample log {}: {e}", path.display());
            return;
        }
    };
    let mut writer = BufWriter::new(file);
    while let Ok(row) = receiver.recv() {
        if let Err(e) = writeln!(writer, "{}", format_row(&row)).and_then(|()| writer.flush()) {
            eprintln!("failed to append to sample log {}: {e}", path.display());
        }
    }
}
