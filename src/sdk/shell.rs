use crate::sdk::error::{
    NavError, Permission, LOCATION_REQUIRED_MESSAGE, MICROPHONE_REQUIRED_MESSAGE,
};
use crate::sdk::location::LocationProvider;
use crate::sdk::map::MapView;
use crate::sdk::orchestrator::NavigationContext;
use crate::sdk::queue::{SubmitError, Turn, TurnHandle, TurnQueue, TurnResult};
use crate::sdk::speech::{CaptureError, SpeechCapture};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};

/// A startup fix that takes longer than this is treated as no fix.
const LOCATION_FIX_TIMEOUT: Duration = Duration::from_secs(15);

/// Words that end the session instead of being sent to the interpreter.
const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// Where user-facing text ends up. Cloned between the shell and the turn
/// queue, so implementations share their output.
pub trait DisplaySurface: Send + Clone {
    fn show(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDisplay;

impl DisplaySurface for StdoutDisplay {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Runtime grants. A missing grant disables the feature behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub microphone: bool,
    pub location: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            microphone: true,
            location: true,
        }
    }
}

impl Permissions {
    fn set(&mut self, permission: Permission, granted: bool) {
        match permission {
            Permission::Microphone => self.microphone = granted,
            Permission::Location => self.location = granted,
        }
    }
}

/// What pressing the voice button led to.
#[derive(Debug)]
pub enum Trigger {
    Submitted(TurnHandle),
    /// Nothing usable was heard; pressing again may work.
    Rejected,
    /// Microphone not granted or no recognizer. Pressing again will not help
    /// until the situation changes.
    Unavailable,
    Quit,
    Closed,
}

/// The user-facing surface: voice button, permission gates, display text.
pub struct Shell<C, D, M> {
    capture: C,
    display: D,
    queue: TurnQueue<M>,
    location: Arc<dyn LocationProvider>,
    permissions: Permissions,
    started: bool,
    seeding: Option<JoinHandle<Option<TurnHandle>>>,
}

impl<C, D, M> Shell<C, D, M>
where
    C: SpeechCapture,
    D: DisplaySurface,
    M: MapView + 'static,
{
    pub fn new(
        capture: C,
        display: D,
        queue: TurnQueue<M>,
        location: Arc<dyn LocationProvider>,
        permissions: Permissions,
    ) -> Self {
        Self {
            capture,
            display,
            queue,
            location,
            permissions,
            started: false,
            seeding: None,
        }
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Looks up the user's position in the background and feeds it to the
    /// queue as the startup origin. Voice turns may run before it lands.
    pub fn start(&mut self) {
        self.started = true;
        if !self.permissions.location {
            log::warn!("Location permission not granted");
            self.show_error(NavError::PermissionDenied(Permission::Location));
            return;
        }
        let location = Arc::clone(&self.location);
        let submitter = self.queue.submitter();
        self.seeding = Some(tokio::spawn(async move {
            let lookup = tokio::time::timeout(LOCATION_FIX_TIMEOUT, location.last_known());
            let fix = match lookup.await {
                Ok(fix) => fix,
                Err(_) => {
                    log::warn!("[Location] No fix within {:?}", LOCATION_FIX_TIMEOUT);
                    None
                }
            };
            match submitter.submit(Turn::SeedOrigin(fix)) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::error!("[Location] Startup fix dropped: {}", e);
                    None
                }
            }
        }));
    }

    /// Waits for the pending startup fix, if any, to be applied.
    pub async fn startup_fix(&mut self) -> Option<TurnResult> {
        let seeding = self.seeding.take()?;
        let handle = match seeding.await {
            Ok(handle) => handle?,
            Err(e) => {
                log::error!("[Location] Lookup task failed: {}", e);
                return None;
            }
        };
        handle.finished().await
    }

    /// Captures one utterance and queues it for the orchestrator.
    pub async fn on_voice_button(&mut self) -> Trigger {
        if !self.permissions.microphone {
            self.show_error(NavError::PermissionDenied(Permission::Microphone));
            return Trigger::Unavailable;
        }

        let text = match self.capture.capture().await {
            Ok(text) => text,
            Err(CaptureError::Closed) => return Trigger::Closed,
            Err(e @ (CaptureError::Unavailable(_) | CaptureError::Io(_))) => {
                self.show_error(NavError::from(e));
                return Trigger::Unavailable;
            }
            Err(e) => {
                self.show_error(NavError::from(e));
                return Trigger::Rejected;
            }
        };

        if QUIT_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
            return Trigger::Quit;
        }

        match self.queue.submit(Turn::Utterance(text)) {
            Ok(handle) => Trigger::Submitted(handle),
            Err(SubmitError::EmptyUtterance) => {
                self.show_error(NavError::from(CaptureError::Empty));
                Trigger::Rejected
            }
            Err(e @ SubmitError::Closed) => {
                log::error!("{}", e);
                Trigger::Closed
            }
        }
    }

    /// Outcome of a runtime permission prompt. A grant re-runs the action the
    /// permission was gating; a granted location fix can be awaited with
    /// `startup_fix`.
    pub async fn on_permission_result(
        &mut self,
        permission: Permission,
        granted: bool,
    ) -> Option<Trigger> {
        self.permissions.set(permission, granted);
        match (permission, granted) {
            (Permission::Microphone, true) => Some(self.on_voice_button().await),
            (Permission::Microphone, false) => {
                self.display.show(MICROPHONE_REQUIRED_MESSAGE);
                None
            }
            (Permission::Location, true) => {
                self.start();
                None
            }
            (Permission::Location, false) => {
                self.display.show(LOCATION_REQUIRED_MESSAGE);
                None
            }
        }
    }

    /// Presses the voice button until the input closes or the user quits,
    /// waiting for each turn before listening again. Returns the final state.
    pub async fn run(mut self) -> Result<NavigationContext<M>, JoinError> {
        if !self.started {
            self.start();
        }
        // Startup fix is applied before the first prompt
        self.startup_fix().await;

        loop {
            match self.on_voice_button().await {
                Trigger::Submitted(handle) => {
                    handle.finished().await;
                }
                Trigger::Rejected => continue,
                Trigger::Unavailable | Trigger::Quit | Trigger::Closed => break,
            }
        }
        self.queue.shutdown().await
    }

    fn show_error(&mut self, err: NavError) {
        log::warn!("{}", err);
        self.display.show(err.user_message());
    }
}
