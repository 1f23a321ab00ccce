use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayState {
    #[default]
    On,
    Off,
}

/// Power switch for the display. Clones control the same display.
#[derive(Clone, Debug)]
pub struct DisplayControl {
    tx: Arc<watch::Sender<DisplayState>>,
}

impl Default for DisplayControl {
    fn default() -> Self {
        Self::new(DisplayState::On)
    }
}

impl DisplayControl {
    pub fn new(initial: DisplayState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn turn_on(&self) {
        self.set(DisplayState::On);
    }

    pub fn turn_off(&self) {
        self.set(DisplayState::Off);
    }

    pub fn set(&self, state: DisplayState) {
        let changed = self.tx.send_if_modified(|cur| {
            if *cur == state {
                return false;
            }
            *cur = state;
            true
        });
        if changed {
            log::info!("display {state:?}");
        }
    }

    pub fn state(&self) -> DisplayState {
        *self.tx.borrow()
    }

    pub fn is_on(&self) -> bool {
        self.state() == DisplayState::On
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let control = DisplayControl::default();
        let mut rx = control.subscribe();
        assert!(control.is_on());

        let remote = control.clone();
        remote.turn_off();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), DisplayState::Off);
        assert_eq!(control.state(), DisplayState::Off);

        // No change, no notification.
        remote.turn_off();
        assert!(!rx.has_changed().unwrap());
    }
}
