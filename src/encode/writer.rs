use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context as _;
use tracing::info;

use crate::encode::buffer::EncodedImage;
use crate::foundation::error::{FailedWrite, OliveError, OliveResult, WriteFailures};

/// One output file: the `index`-th copy of the shared buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteTask {
    /// 1-based position in the batch.
    pub index: u32,
    pub path: PathBuf,
}

impl WriteTask {
    /// `<dir>/<prefix><index>.<ext>`
    pub fn new(dir: &Path, prefix: &str, index: u32, ext: &str) -> Self {
        Self {
            index,
            path: dir.join(format!("{prefix}{index}.{ext}")),
        }
    }
}

/// Where and how many copies to write.
#[derive(Clone, Debug)]
pub struct WriteOpts {
    pub output: PathBuf,
    pub prefix: String,
    pub count: u32,
    /// Maximum in-flight writes. `None` uses the host's available parallelism.
    pub concurrency: Option<usize>,
    /// Log every completed write.
    pub verbose: bool,
}

/// Summary of a fully successful batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub concurrency: usize,
}

/// Default concurrency bound: one write per available processing unit.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Create `dir` (and parents) if missing.
pub fn ensure_output_dir(dir: &Path) -> OliveResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    Ok(())
}

/// Every task of the batch, in submission order.
pub fn plan_tasks(opts: &WriteOpts, ext: &str) -> Vec<WriteTask> {
    (1..=opts.count)
        .map(|i| WriteTask::new(&opts.output, &opts.prefix, i, ext))
        .collect()
}

/// Write `image` to `opts.count` files on a fixed-size worker pool.
///
/// Tasks are queued in index order and run at most `concurrency` at a time. Every task runs to
/// completion; if any fail, all failures are reported together and files that were written are
/// left in place.
pub fn write_copies(image: &EncodedImage, opts: &WriteOpts) -> OliveResult<WriteReport> {
    write_copies_with(image, opts, |path, bytes| std::fs::write(path, bytes))
}

/// [`write_copies`] with the per-file write supplied by the caller.
pub(crate) fn write_copies_with<W>(
    image: &EncodedImage,
    opts: &WriteOpts,
    write: W,
) -> OliveResult<WriteReport>
where
    W: Fn(&Path, &[u8]) -> std::io::Result<()> + Sync,
{
    let concurrency = match opts.concurrency {
        Some(0) => {
            return Err(OliveError::Other(anyhow::anyhow!(
                "write concurrency must be >= 1 when set"
            )));
        }
        Some(n) => n,
        None => default_concurrency(),
    };
    if opts.verbose {
        info!("Using concurrency limit of {concurrency}");
    }

    let tasks = plan_tasks(opts, image.extension());
    let total = tasks.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .thread_name(|i| format!("olive-write-{i}"))
        .build()
        .context("build write thread pool")?;

    let (tx, rx) = mpsc::channel::<(u32, PathBuf, std::io::Result<()>)>();
    let bytes = image.bytes();
    let write = &write;
    pool.scope_fifo(|scope| {
        for task in &tasks {
            let tx = tx.clone();
            scope.spawn_fifo(move |_| {
                let result = write(&task.path, bytes);
                if result.is_ok() && opts.verbose {
                    info!("[{}/{}] Saved: {}", task.index, total, task.path.display());
                }
                // The receiver outlives the scope.
                let _ = tx.send((task.index, task.path.clone(), result));
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<_> = rx.into_iter().collect();
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut written = 0usize;
    let mut failed = Vec::new();
    for (_, path, result) in outcomes {
        match result {
            Ok(()) => written += 1,
            Err(source) => failed.push(FailedWrite { path, source }),
        }
    }

    if !failed.is_empty() {
        tracing::warn!(written, failed = failed.len(), "write batch incomplete");
        return Err(OliveError::Write(WriteFailures { written, failed }));
    }

    Ok(WriteReport {
        written,
        concurrency,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/writer.rs"]
mod tests;
