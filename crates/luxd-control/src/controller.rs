//! Control orchestrator
//!
//! Owns the fixture registry, the enable switch and the fixed-rate tick
//! loop. One process-wide lock serializes command handling, the tick and
//! the listener thread's timestamp updates; a tick (advance all programs,
//! recompute all universes, gate and send) is atomic under it.

use std::collections::BTreeMap;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use luxd_core::ProgramResolver;

use crate::artnet::{self, ArtNetTransport};
use crate::config::ControllerConfig;
use crate::error::{ControlError, Result};
use crate::fixture::Fixture;
use crate::registry::FixtureRegistry;
use crate::universe::Universe;

/// Poll granularity of the listener socket, bounds shutdown latency
const LISTENER_POLL: Duration = Duration::from_millis(250);

struct Shared {
    enabled: bool,
    registry: FixtureRegistry,
    universes: BTreeMap<u16, Universe>,
    transport: ArtNetTransport,
}

/// The lighting orchestrator.
///
/// Cheap to clone; clones share the same state and shutdown flag.
#[derive(Clone)]
pub struct LightController {
    shared: Arc<Mutex<Shared>>,
    resolver: Arc<ProgramResolver>,
    config: ControllerConfig,
    shutdown: Arc<AtomicBool>,
}

impl LightController {
    /// Create a controller around a resolver and a transport
    pub fn new(
        resolver: Arc<ProgramResolver>,
        config: ControllerConfig,
        transport: ArtNetTransport,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                enabled: false,
                registry: FixtureRegistry::new(),
                universes: BTreeMap::new(),
                transport,
            })),
            resolver,
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a fixture under an external id
    pub fn register(&self, id: u32, fixture: Box<dyn Fixture>) -> Result<()> {
        let mut shared = self.shared.lock();
        for span in fixture.footprint() {
            shared
                .universes
                .entry(span.universe)
                .or_insert_with(|| Universe::new(span.universe));
        }
        shared.registry.register(id, fixture)?;
        debug!(id, "fixture registered");
        Ok(())
    }

    /// Reset every fixture to its default program and enable output.
    ///
    /// A default that no longer resolves keeps the fixture's current
    /// program; the show must not stop over one bad spec.
    pub fn turn_on(&self) {
        let mut shared = self.shared.lock();
        for (id, fixture) in shared.registry.iter_mut() {
            let spec = fixture.default_spec().to_string();
            let resolved = if fixture.wants_stripe_program() {
                self.resolver.resolve_for_stripe(&spec)
            } else {
                self.resolver.resolve(&spec)
            };
            match resolved {
                Ok(program) => fixture.set_program(program),
                Err(err) => warn!(id, %spec, %err, "default program failed to resolve"),
            }
        }
        shared.enabled = true;
        info!("lighting output enabled");
    }

    /// Disable output; animation state is preserved, not torn down
    pub fn turn_off(&self) {
        self.shared.lock().enabled = false;
        info!("lighting output disabled");
    }

    /// Whether ticks currently produce output
    pub fn is_enabled(&self) -> bool {
        self.shared.lock().enabled
    }

    /// Resolve a spec and assign it to a fixture.
    ///
    /// On resolution failure the previous program is retained and the
    /// error is returned to the caller.
    pub fn set_program(&self, id: u32, spec: &str) -> Result<()> {
        let mut shared = self.shared.lock();
        let fixture = shared
            .registry
            .get_mut(id)
            .ok_or(ControlError::UnknownFixture(id))?;
        let program = if fixture.wants_stripe_program() {
            self.resolver.resolve_for_stripe(spec)?
        } else {
            self.resolver.resolve(spec)?
        };
        fixture.set_program(program);
        debug!(id, spec, "program replaced");
        Ok(())
    }

    /// One animation step: advance every program, recompute every
    /// universe, then gate and send. No-op while disabled.
    pub fn tick(&self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&self, now: Instant) {
        let mut guard = self.shared.lock();
        if !guard.enabled {
            return;
        }
        let shared = &mut *guard;
        // All programs advance before any universe is recomputed, so every
        // universe sees the same animation instant.
        for (_, fixture) in shared.registry.iter_mut() {
            fixture.advance();
        }
        for universe in shared.universes.values_mut() {
            universe.recompute(&mut shared.registry);
            if let Err(err) = shared
                .transport
                .maybe_send(universe.id(), universe.buffer(), now)
            {
                warn!(universe = universe.id(), %err, "ArtNet send failed");
            }
        }
    }

    /// Copy of a universe's buffer as last recomputed
    pub fn universe_snapshot(&self, id: u16) -> Option<Vec<u8>> {
        self.shared
            .lock()
            .universes
            .get(&id)
            .map(|universe| universe.buffer().to_vec())
    }

    /// Spawn the fixed-rate tick thread
    pub fn spawn_ticker(&self) -> Result<JoinHandle<()>> {
        let controller = self.clone();
        let interval = self.config.tick_interval;
        let handle = thread::Builder::new()
            .name("light-ticker".to_string())
            .spawn(move || {
                info!(?interval, "tick loop running");
                while !controller.is_shutdown() {
                    thread::sleep(interval);
                    controller.tick();
                }
                info!("tick loop stopped");
            })?;
        Ok(handle)
    }

    /// Bind the ArtNet port and spawn the passive listener thread.
    ///
    /// A bind failure is fatal and reported to the caller; once running,
    /// per-datagram errors only drop that datagram.
    pub fn spawn_listener(&self) -> Result<JoinHandle<()>> {
        let bind_addr = self.shared.lock().transport.bind_addr();
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_read_timeout(Some(LISTENER_POLL))?;
        info!(%bind_addr, "ArtNet listener bound");

        let shared = Arc::clone(&self.shared);
        let shutdown = Arc::clone(&self.shutdown);
        let handle = thread::Builder::new()
            .name("artnet-listener".to_string())
            .spawn(move || {
                let mut buf = [0u8; 2048];
                while !shutdown.load(Ordering::Relaxed) {
                    let len = match socket.recv_from(&mut buf) {
                        Ok((len, _)) => len,
                        Err(err)
                            if matches!(
                                err.kind(),
                                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                            ) =>
                        {
                            continue
                        }
                        Err(err) => {
                            error!(%err, "ArtNet listener socket failed");
                            break;
                        }
                    };
                    let datagram = &buf[..len];
                    let Ok(universe) = artnet::peek_universe(datagram) else {
                        // Too short to carry a header; drop silently.
                        continue;
                    };
                    debug!(universe, len, "observed third-party ArtNet frame");
                    let mut shared = shared.lock();
                    shared.transport.note_activity(universe, Instant::now());
                    shared.transport.forward(universe, datagram);
                }
                info!("ArtNet listener stopped");
            })?;
        Ok(handle)
    }

    /// Ask the tick and listener loops to stop
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        info!("shutdown requested");
    }

    /// Whether shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
