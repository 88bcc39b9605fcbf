//! Ordered forwarding of the current pick to `/set_image` and `/set_video`
//!
//! One worker thread owns every post, so picks reach the server in the order
//! they were made. The worker remembers the last pick the server accepted
//! and skips repeats of it. A failed post is not remembered, so the next
//! identical pick is sent again.

use crate::backend::{MediaBackend, OutputChannel, OutputSelection};
use crate::notices::{Notice, NoticeLevel, NoticeSender};
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// What downstream nodes are told to use
pub type Pick = (OutputChannel, OutputSelection);

enum Job {
    Forward(Pick),
    /// Answered once every job queued before it is done
    Flush(Sender<()>),
}

/// Handle to the forwarding worker
///
/// The worker exits when the handle is dropped and its queue is drained.
pub struct OutputForwarder {
    jobs: Sender<Job>,
}

impl fmt::Debug for OutputForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputForwarder").finish_non_exhaustive()
    }
}

impl OutputForwarder {
    /// Start the worker
    #[must_use]
    pub fn spawn(backend: Arc<dyn MediaBackend>, notices: NoticeSender) -> Self {
        let (jobs, queue) = mpsc::channel();
        thread::spawn(move || run(backend.as_ref(), &notices, &queue));
        Self { jobs }
    }

    /// Queue a pick behind every earlier one
    pub fn forward(&self, pick: Pick) {
        if self.jobs.send(Job::Forward(pick)).is_err() {
            log::error!("Output forwarding worker is gone");
        }
    }

    /// Block until every queued pick has been posted or has failed
    pub fn flush(&self) {
        let (done, wait) = mpsc::channel();
        if self.jobs.send(Job::Flush(done)).is_err() || wait.recv().is_err() {
            log::error!("Output forwarding worker is gone");
        }
    }
}

fn run(backend: &dyn MediaBackend, notices: &NoticeSender, queue: &Receiver<Job>) {
    // Last pick the server acknowledged
    let mut accepted: Option<Pick> = None;

    for job in queue {
        match job {
            Job::Forward(pick) => {
                if accepted.as_ref() == Some(&pick) {
                    continue;
                }
                let (channel, selection) = &pick;
                match backend.set_output(*channel, selection) {
                    Ok(()) => accepted = Some(pick),
                    Err(e) => {
                        log::warn!("Forwarding selection to /{} failed: {e}", channel.path());
                        notices.send(Notice::new(NoticeLevel::Warning, format!("Could not update output: {e}")));
                    }
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
