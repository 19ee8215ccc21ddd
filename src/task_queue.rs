use crate::RequestPaint;

/// A worker thread fed through a channel, results come back on another.
pub struct TaskQueue<I, O> {
    queue: flume::Sender<I>,
    ready: flume::Receiver<(I, O)>,
    handle: std::thread::JoinHandle<()>,
}

impl<I, O> TaskQueue<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<R, F>(repaint: R, spawn: F) -> Self
    where
        R: RequestPaint + 'static,
        F: FnOnce(R, flume::Receiver<I>, flume::Sender<(I, O)>) + Send + 'static,
    {
        let (queue_tx, queue_rx) = flume::unbounded();
        let (ready_tx, ready_rx) = flume::unbounded();

        let handle = std::thread::spawn(move || spawn(repaint, queue_rx, ready_tx));

        Self {
            queue: queue_tx,
            ready: ready_rx,
            handle,
        }
    }

    /// Stops accepting work and waits for whatever is in flight.
    pub fn join(self) -> Vec<(I, O)> {
        drop(self.queue);
        let _ = self.handle.join();
        self.ready.into_iter().collect()
    }

    pub fn enqueue(&self, item: I) {
        let _ = self.queue.send(item);
    }

    pub fn try_next(&self) -> Option<(I, O)> {
        self.ready.try_recv().ok()
    }
}
