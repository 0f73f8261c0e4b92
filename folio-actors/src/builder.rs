use crate::actor::{spawn_actor_reserved, Actor, Addr, Reserved};
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;
use std::collections::HashMap;

/// Wires actors together: reserve mailboxes first, start them once every
/// address they need exists, then run until Ctrl-C or an internal shutdown.
pub struct Builder {
    sys: ActorSystem,
    // Concrete addresses by name for late wiring.
    addrs: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            addrs: HashMap::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve an actor and publish its `Addr` under `name`.
    pub fn reserve<A>(&mut self, name: &str, mailbox: usize) -> Reserved<A>
    where
        A: Actor,
        Addr<A>: Clone + Send + Sync + 'static,
    {
        let r = spawn_actor_reserved::<A>(name.to_string(), mailbox);
        self.addrs.insert(name.to_string(), Box::new(r.addr()));
        r
    }

    /// Start a previously reserved actor and track its task.
    pub fn start_reserved<A>(&mut self, r: Reserved<A>, actor: A) -> &mut Self
    where
        A: Actor,
        Addr<A>: Clone + Send + Sync + 'static,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        self
    }

    /// Track an auxiliary task (feeders, helpers) so shutdown awaits it.
    pub fn track(
        &mut self,
        fut: impl std::future::Future<Output = Result<()>> + Send + 'static,
    ) -> &mut Self {
        self.sys.track(fut);
        self
    }

    /// Get a typed address by name.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>>
    where
        Addr<A>: Clone + 'static,
    {
        self.addrs
            .get(name)
            .and_then(|b| b.downcast_ref::<Addr<A>>().cloned())
    }

    /// Block until CTRL-C or an internal shutdown signal, then shut everything down.
    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(target = "folio-actors", "ctrl-c received");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!(target = "folio-actors", "shutdown requested");
            }
        }
        // Drop published addresses so actor mailboxes can close.
        self.addrs.clear();
        self.sys.graceful_shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Context;

    struct Sink;

    #[async_trait::async_trait]
    impl Actor for Sink {
        type Msg = ();
        async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn reserved_addresses_are_published_by_name() {
        let mut b = Builder::new();
        let r = b.reserve::<Sink>("sink", 4);
        assert!(b.addr::<Sink>("sink").is_some());
        assert!(b.addr::<Sink>("missing").is_none());
        b.start_reserved(r, Sink);
        let shutdown = b.shutdown_handle();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            shutdown.signal();
        });
        b.run_until_ctrl_c().await.unwrap();
    }
}
