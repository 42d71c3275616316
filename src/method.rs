//! Typed request/response calls carried over a sink's execution mode.
//!
//! A method is a sink whose payload is a [`CallContext`]: the call's request
//! plus a one-shot completion channel the dispatcher uses to hand back a
//! result. `call` sends the context to the method's sink and waits on that
//! channel; `call_async`/[`PendingCall::wait`] split the send and the wait
//! across two calls, possibly on different threads.
//!
//! **Deadlock hazard:** a queued method drained only by the thread that also
//! makes synchronous `call`s blocks forever — the dispatcher never runs to
//! signal completion. Methods must be drained by a thread distinct from any
//! of their synchronous callers.

use crate::engine;
use crate::error::Error;
use crate::sink::Sink;
use crate::spsc;
use crate::time::Timeout;
use std::sync::Arc;

/// The payload carried by a method's sink: one call's request, plus the
/// channel used to hand its result back to the caller.
pub struct CallContext<Req, Resp> {
    request: Req,
    completion: spsc::Sender<Result<Resp, i32>, 1>,
}

impl<Req, Resp> CallContext<Req, Resp> {
    pub fn request(&self) -> &Req {
        &self.request
    }
}

fn dispatch<Req, Resp, U>(
    handler: &(dyn Fn(&Req, &U) -> Result<Resp, i32> + Send + Sync),
    ctx: &CallContext<Req, Resp>,
    user_data: &U,
) {
    let result = handler(&ctx.request, user_data);
    // A failed send here just means the caller abandoned the call
    // (dropped its `PendingCall`/gave up on `call`) before we finished.
    let _ = ctx.completion.try_send(result);
}

/// A typed RPC endpoint: a dispatcher function wrapped in a sink.
pub struct Method<Req, Resp, U = ()> {
    sink: Arc<Sink<CallContext<Req, Resp>, U>>,
}

impl<Req, Resp, U> Method<Req, Resp, U>
where
    Req: Send + 'static,
    Resp: Send + 'static,
    U: Send + Sync + 'static,
{
    /// An immediate-mode method: the handler runs on the caller's thread
    /// during the send step of `call`/`call_async`.
    pub fn immediate(
        #[cfg(feature = "names")] name: &'static str,
        user_data: U,
        handler: impl Fn(&Req, &U) -> Result<Resp, i32> + Send + Sync + 'static,
    ) -> Self {
        let handler = Arc::new(handler);
        let sink = Sink::immediate(
            #[cfg(feature = "names")]
            name,
            user_data,
            move |ctx: &CallContext<Req, Resp>, user_data: &U| {
                dispatch(handler.as_ref(), ctx, user_data)
            },
        );
        Self { sink }
    }

    /// A queued-mode method backed by a fresh bounded queue of `capacity`;
    /// some other thread must drain [`Method::sink`] via
    /// [`crate::engine::process`]/[`crate::engine::process_one`].
    pub fn queued(
        #[cfg(feature = "names")] name: &'static str,
        user_data: U,
        handler: impl Fn(&Req, &U) -> Result<Resp, i32> + Send + Sync + 'static,
        capacity: usize,
    ) -> Self {
        let handler = Arc::new(handler);
        let sink = Sink::queued(
            #[cfg(feature = "names")]
            name,
            user_data,
            move |ctx: &CallContext<Req, Resp>, user_data: &U| {
                dispatch(handler.as_ref(), ctx, user_data)
            },
            capacity,
        );
        Self { sink }
    }

    /// The sink backing this method — link it into a [`crate::source::Source`]
    /// for static/dynamic wiring, or drain it directly if queued.
    pub fn sink(&self) -> &Arc<Sink<CallContext<Req, Resp>, U>> {
        &self.sink
    }

    /// Synchronous call: send the request with an unbounded wait on queue
    /// admission, then wait indefinitely for the dispatcher's result.
    pub fn call(&self, request: Req) -> Result<Resp, Error> {
        self.call_async(request)?.wait(Timeout::Indefinite)
    }

    /// Send the request and return a handle the caller can wait on later,
    /// possibly from a different thread than the one that sent it.
    pub fn call_async(&self, request: Req) -> Result<PendingCall<Resp>, Error> {
        let (tx, rx) = spsc::channel::<Result<Resp, i32>, 1>();
        let ctx = CallContext {
            request,
            completion: tx,
        };
        engine::send_direct(&self.sink, ctx, None, Timeout::Indefinite)?;
        Ok(PendingCall { rx })
    }
}

/// A call whose request has been sent but whose result has not yet been
/// waited on. Owns its own completion channel, so it may be handed off
/// before `wait` is called.
pub struct PendingCall<Resp> {
    rx: spsc::Receiver<Result<Resp, i32>, 1>,
}

impl<Resp> PendingCall<Resp> {
    /// Wait up to `timeout` for the dispatcher to signal a result.
    pub fn wait(self, timeout: Timeout) -> Result<Resp, Error> {
        let deadline = timeout.deadline();
        loop {
            match self.rx.try_recv() {
                Ok(Some(Ok(resp))) => return Ok(resp),
                Ok(Some(Err(code))) => return Err(Error::HandlerFailed(code)),
                Err(_) => return Err(Error::NotSupported),
                Ok(None) => {}
            }
            if matches!(deadline.remaining(), Timeout::NonBlocking) {
                return Err(Error::Timeout);
            }
            std::hint::spin_loop();
        }
    }
}
