use std::any::Any;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::gpu::{GpuBackend, HandleAllocator, HeadlessBackend, HeadlessProbe, TextureId, WgpuBackend};

use super::RenderContext;

/// Unit of deferred GPU work. Failures are reported by the worker, never returned to
/// the producer.
pub type RenderTask = Box<dyn FnOnce(&mut RenderContext) -> Result<(), RenderError> + Send + 'static>;

/// Out-of-band receiver of task failures.
pub type ErrorHook = Arc<dyn Fn(&RenderError) + Send + Sync>;

enum Message {
    Task { seq: u64, task: RenderTask },
    Shutdown,
}

/// Sequence numbers are assigned under the same lock as the send, so the channel
/// order is the global enqueue order across producers. `closed` is set once shutdown
/// has been queued; nothing may follow it.
struct Queue {
    next_seq: u64,
    closed: bool,
    sender: Sender<Message>,
}

struct Fence {
    completed: u64,
    running: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    fence: Mutex<Fence>,
    fence_cv: Condvar,
    handles: HandleAllocator,
    failures: AtomicU64,
    error_hook: Mutex<Option<ErrorHook>>,
    render_thread: OnceLock<ThreadId>,
    screen: TextureId,
}

impl Shared {
    fn complete(&self, seq: u64) {
        let mut fence = self.fence.lock();
        fence.completed = seq;
        self.fence_cv.notify_all();
    }

    fn stop(&self) {
        let mut fence = self.fence.lock();
        fence.running = false;
        self.fence_cv.notify_all();
    }

    fn report(&self, err: &RenderError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        log::warn!("RenderRunner: task failed: {err}");
        let hook = self.error_hook.lock().clone();
        if let Some(hook) = hook {
            hook(err);
        }
    }
}

/// Producer side of the command channel.
///
/// Cheap to clone and usable from any thread.
#[derive(Clone)]
pub struct RenderHandle {
    shared: Arc<Shared>,
}

impl RenderHandle {
    /// Enqueues `task` behind everything posted so far, from any thread.
    ///
    /// Never blocks on the worker. Tasks posted after the worker stopped are dropped.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce(&mut RenderContext) -> Result<(), RenderError> + Send + 'static,
    {
        let mut queue = self.shared.queue.lock();
        if queue.closed {
            log::warn!("RenderRunner: worker shutting down; dropping task");
            return;
        }
        let seq = queue.next_seq + 1;
        if queue.sender.send(Message::Task { seq, task: Box::new(task) }).is_err() {
            log::warn!("RenderRunner: worker stopped; dropping task");
            return;
        }
        queue.next_seq = seq;
    }

    /// Blocks until every task posted before this call has finished.
    ///
    /// Called on the render thread itself it returns immediately: the caller is one
    /// of those tasks.
    pub fn sync(&self) -> Result<(), RenderError> {
        if self.is_render_thread() {
            log::warn!("RenderRunner: sync() called from the render thread; ignoring");
            return Ok(());
        }

        let target = self.shared.queue.lock().next_seq;
        let mut fence = self.shared.fence.lock();
        while fence.completed < target {
            if !fence.running {
                return Err(RenderError::WorkerStopped);
            }
            self.shared.fence_cv.wait(&mut fence);
        }
        Ok(())
    }

    /// Runs `f` on the render thread and waits for its result.
    pub fn call<R, F>(&self, f: F) -> Result<R, RenderError>
    where
        F: FnOnce(&mut RenderContext) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.post(move |ctx| {
            let _ = tx.send(f(ctx));
            Ok(())
        });
        self.sync()?;
        rx.try_recv()
            .map_err(|_| RenderError::TaskPanicked("render call produced no result".to_owned()))
    }

    pub fn is_render_thread(&self) -> bool {
        self.shared.render_thread.get() == Some(&thread::current().id())
    }

    pub fn handles(&self) -> &HandleAllocator {
        &self.shared.handles
    }

    /// The default render target.
    pub fn screen(&self) -> TextureId {
        self.shared.screen
    }

    /// Number of tasks that failed or panicked so far.
    pub fn failure_count(&self) -> u64 {
        self.shared.failures.load(Ordering::Relaxed)
    }

    /// Installs a callback invoked on the render thread for every task failure.
    pub fn set_error_hook(&self, hook: Option<ErrorHook>) {
        *self.shared.error_hook.lock() = hook;
    }
}

/// Owner of the render thread.
///
/// Dereferences to its [`RenderHandle`]. Dropping it lets every pending task run,
/// then stops and joins the thread.
pub struct RenderRunner {
    handle: RenderHandle,
    thread: Option<JoinHandle<()>>,
}

impl RenderRunner {
    /// Spawns the render thread and builds the backend on it.
    pub fn spawn<F>(config: RendererConfig, factory: F) -> Result<Self, RenderError>
    where
        F: FnOnce(&RendererConfig) -> anyhow::Result<Box<dyn GpuBackend>> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let handles = HandleAllocator::new();
        let screen = handles.texture();
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue { next_seq: 0, closed: false, sender }),
            fence: Mutex::new(Fence { completed: 0, running: true }),
            fence_cv: Condvar::new(),
            handles,
            failures: AtomicU64::new(0),
            error_hook: Mutex::new(None),
            render_thread: OnceLock::new(),
            screen,
        });

        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), RenderError>>(1);
        let worker = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                let _ = worker.render_thread.set(thread::current().id());

                let ctx = factory(&config)
                    .map_err(|e| RenderError::Init(format!("{e:#}")))
                    .and_then(|backend| RenderContext::new(backend, screen, config.resolution));
                let mut ctx = match ctx {
                    Ok(ctx) => ctx,
                    Err(err) => {
                        worker.stop();
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                run(&worker, &mut ctx, receiver);
                worker.stop();
            })
            .map_err(|e| RenderError::Init(format!("failed to spawn render thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { handle: RenderHandle { shared }, thread: Some(thread) }),
            Ok(Err(err)) => {
                let _ = thread.join();
                Err(err)
            }
            Err(_) => {
                let _ = thread.join();
                Err(RenderError::Init("render thread exited during start-up".to_owned()))
            }
        }
    }

    /// Worker backed by [`HeadlessBackend`]; the probe inspects its state.
    pub fn headless(config: RendererConfig) -> Result<(Self, HeadlessProbe), RenderError> {
        let (backend, probe) = HeadlessBackend::new();
        let runner = Self::spawn(config, move |_| Ok(Box::new(backend) as Box<dyn GpuBackend>))?;
        Ok((runner, probe))
    }

    /// Worker backed by a wgpu device.
    pub fn wgpu(config: RendererConfig) -> Result<Self, RenderError> {
        Self::spawn(config, |config| {
            let backend = pollster::block_on(WgpuBackend::new(&config.gpu))?;
            Ok(Box::new(backend) as Box<dyn GpuBackend>)
        })
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle.clone()
    }
}

impl Deref for RenderRunner {
    type Target = RenderHandle;

    fn deref(&self) -> &RenderHandle {
        &self.handle
    }
}

impl Drop for RenderRunner {
    fn drop(&mut self) {
        {
            let mut queue = self.handle.shared.queue.lock();
            queue.closed = true;
            let _ = queue.sender.send(Message::Shutdown);
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("RenderRunner: render thread panicked");
            }
        }
    }
}

/// Pull loop: dequeue, execute, repeat. Blocks in `recv` while the queue is empty.
fn run(shared: &Shared, ctx: &mut RenderContext, receiver: Receiver<Message>) {
    log::info!("RenderRunner: worker started");
    for message in receiver.iter() {
        let (seq, task) = match message {
            Message::Task { seq, task } => (seq, task),
            Message::Shutdown => break,
        };

        let result = match panic::catch_unwind(AssertUnwindSafe(|| task(ctx))) {
            Ok(result) => result,
            Err(payload) => Err(RenderError::TaskPanicked(panic_message(payload.as_ref()))),
        };
        if let Err(err) = result {
            shared.report(&err);
        }
        shared.complete(seq);
    }
    log::info!("RenderRunner: worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{init_logging, LoggingConfig};
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    fn runner() -> RenderRunner {
        init_logging(LoggingConfig::for_tests());
        RenderRunner::headless(RendererConfig::default()).unwrap().0
    }

    // ── ordering ─────────────────────────────────────────────────────────

    #[test]
    fn sync_waits_for_posted_tasks() {
        let runner = runner();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            runner.post(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        runner.sync().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn tasks_run_in_post_order() {
        let runner = runner();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..50 {
            let log = Arc::clone(&log);
            runner.post(move |_| {
                log.lock().push(i);
                Ok(())
            });
        }
        runner.sync().unwrap();
        assert_eq!(*log.lock(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn tasks_from_two_threads_all_run_before_sync_returns() {
        let runner = runner();
        let log = Arc::new(Mutex::new(Vec::new()));

        let post_from = |names: &'static [&'static str]| {
            let handle = runner.handle();
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for name in names {
                    let log = Arc::clone(&log);
                    handle.post(move |_| {
                        log.lock().push(*name);
                        Ok(())
                    });
                }
            })
        };
        let a = post_from(&["a1", "a2"]);
        let b = post_from(&["b1"]);
        a.join().unwrap();
        b.join().unwrap();

        runner.sync().unwrap();

        let log = log.lock().clone();
        assert_eq!(log.len(), 3);
        let pos = |name| log.iter().position(|n| *n == name).unwrap();
        assert!(pos("a1") < pos("a2"));
        assert!(log.contains(&"b1"));
    }

    #[test]
    fn tasks_run_on_the_render_thread() {
        let runner = runner();
        let main = thread::current().id();
        let handle = runner.handle();
        let on_worker = runner
            .call(move |_| handle.is_render_thread() && thread::current().id() != main)
            .unwrap();
        assert!(on_worker);
        assert!(!runner.is_render_thread());
    }

    // ── failures ─────────────────────────────────────────────────────────

    #[test]
    fn failing_and_panicking_tasks_do_not_stop_the_queue() {
        let runner = runner();
        let hooked = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hooked);
        runner.set_error_hook(Some(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })));

        runner.post(|_| Err(RenderError::NoActiveProgram));
        runner.post(|_| panic!("boom"));
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&ran);
        runner.post(move |_| {
            flag.store(1, Ordering::SeqCst);
            Ok(())
        });
        runner.sync().unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(runner.failure_count(), 2);
        assert_eq!(hooked.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sync_inside_a_task_does_not_deadlock() {
        let runner = runner();
        let handle = runner.handle();
        let inner = runner.call(move |_| handle.sync().is_ok()).unwrap();
        assert!(inner);
    }

    #[test]
    fn backend_init_failure_is_reported() {
        let result = RenderRunner::spawn(RendererConfig::default(), |_| anyhow::bail!("no device"));
        match result {
            Err(RenderError::Init(msg)) => assert!(msg.contains("no device")),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("spawn should fail"),
        }
    }

    // ── shutdown ─────────────────────────────────────────────────────────

    #[test]
    fn drop_drains_pending_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle;
        {
            let runner = runner();
            handle = runner.handle();
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                runner.post(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 20);

        // Late posts are dropped and sync does not hang.
        let late = Arc::clone(&counter);
        handle.post(move |_| {
            late.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(handle.sync().is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn posts_behind_a_queued_shutdown_are_dropped_at_once() {
        let runner = runner();
        let handle = runner.handle();
        let token = Arc::new(());
        let held = Arc::new(AtomicUsize::new(0));
        let (t, h) = (Arc::clone(&token), Arc::clone(&held));

        runner.post(move |_| {
            // Wait until the runner's drop has queued its shutdown.
            let deadline = Instant::now() + Duration::from_secs(5);
            while !handle.shared.queue.lock().closed && Instant::now() < deadline {
                thread::yield_now();
            }
            let inner = Arc::clone(&t);
            handle.post(move |_| {
                drop(inner);
                Ok(())
            });
            h.store(Arc::strong_count(&t), Ordering::SeqCst);
            Ok(())
        });
        drop(runner);

        // Only `token` and `t` were alive: the late task was not queued.
        assert_eq!(held.load(Ordering::SeqCst), 2);
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn screen_target_exists_at_configured_size() {
        let (runner, probe) = RenderRunner::headless(RendererConfig {
            resolution: (320, 240),
            ..RendererConfig::default()
        })
        .unwrap();
        runner.sync().unwrap();
        assert_eq!(probe.texture(runner.screen()).unwrap().dimensions(), (320, 240));
    }
}
