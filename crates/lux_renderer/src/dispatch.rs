//! Worker pool fed through a job channel.
//!
//! The producer pushes every job into a work channel, workers push one
//! completion token per job into a done channel, and the calling thread
//! consumes exactly as many tokens as jobs were sent before shutting the
//! pool down with one `Stop` per worker. The token carries the job's
//! result, so only the calling thread ever writes the output.

use crate::{Channel, ProgressTracker};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Message read by workers from the work channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<J> {
    Job(J),
    Stop,
}

/// Fixed-size pool of scoped worker threads.
///
/// Every worker owns a `SmallRng` seeded with `seed + worker index`.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    threads: usize,
    seed: u64,
}

impl WorkerPool {
    /// Pool with `threads` workers; zero means one per hardware thread.
    pub fn new(threads: usize, seed: u64) -> Self {
        let threads = if threads == 0 {
            available_threads()
        } else {
            threads
        };
        Self { threads, seed }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `work` over every job and hand each result to `collect` on the calling thread.
    ///
    /// Returns the number of jobs run. Progress is logged under `label`.
    pub fn run<J, R, W, C>(&self, label: &str, jobs: impl IntoIterator<Item = J>, work: W, mut collect: C) -> usize
    where
        J: Send,
        R: Send,
        W: Fn(J, &mut SmallRng) -> R + Sync,
        C: FnMut(R),
    {
        let work_channel: Channel<Message<J>> = Channel::new();
        let done_channel: Channel<Option<R>> = Channel::new();

        std::thread::scope(|scope| {
            for index in 0..self.threads {
                let work_channel = &work_channel;
                let done_channel = &done_channel;
                let work = &work;
                let seed = self.seed.wrapping_add(index as u64);

                scope.spawn(move || {
                    let _guard = PanicGuard(done_channel);
                    let mut rng = SmallRng::seed_from_u64(seed);
                    loop {
                        match work_channel.receive() {
                            Message::Job(job) => done_channel.send(Some(work(job, &mut rng))),
                            Message::Stop => break,
                        }
                    }
                });
            }

            let mut sent = 0;
            for job in jobs {
                work_channel.send(Message::Job(job));
                sent += 1;
            }
            log::debug!("{label}: {sent} jobs queued for {} workers", self.threads);

            let mut tracker = ProgressTracker::new(label, sent);
            for _ in 0..sent {
                match done_channel.receive() {
                    Some(result) => collect(result),
                    // A worker died; stop waiting and let the scope re-raise its panic
                    None => break,
                }
                tracker.tick();
            }
            tracker.finish();

            for _ in 0..self.threads {
                work_channel.send(Message::Stop);
            }
            sent
        })
    }
}

/// Hardware threads available to the process.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Wakes the tracking loop if a worker unwinds.
struct PanicGuard<'a, R>(&'a Channel<Option<R>>);

impl<R> Drop for PanicGuard<'_, R> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.send(None);
        }
    }
}
